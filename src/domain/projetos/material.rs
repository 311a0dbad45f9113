use serde::{Deserialize, Serialize};

/// A construction material held in stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub nome: String,
    pub descricao: String,
    pub quantidade: i64,
}

impl Material {
    pub fn new(id: i64, nome: String, descricao: String, quantidade: i64) -> Self {
        Self {
            id,
            nome,
            descricao,
            quantidade,
        }
    }
}
