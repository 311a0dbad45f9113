use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fundraising event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evento {
    pub nr: i64,
    pub nome: String,
    pub data: NaiveDate,
}

impl Evento {
    pub fn new(nr: i64, nome: String, data: NaiveDate) -> Self {
        Self { nr, nome, data }
    }
}
