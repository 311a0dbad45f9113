use serde::{Deserialize, Serialize};

/// A member of an applying family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membro {
    pub id: i64,
    pub nome: String,
    /// Application this member belongs to
    pub candidatura: i64,
}

impl Membro {
    pub fn new(id: i64, nome: String, candidatura: i64) -> Self {
        Self {
            id,
            nome,
            candidatura,
        }
    }
}
