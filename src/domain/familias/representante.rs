use serde::{Deserialize, Serialize};

/// The family representative for an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representante {
    pub nr: i64,
    pub nome: String,
    pub contacto: String,
}

impl Representante {
    pub fn new(nr: i64, nome: String, contacto: String) -> Self {
        Self { nr, nome, contacto }
    }
}
