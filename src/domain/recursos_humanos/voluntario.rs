use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A volunteer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voluntario {
    pub nr: i64,

    pub nome: String,

    pub contacto: String,

    pub data_nascimento: Option<NaiveDate>,

    /// Team assignment, `None` while unassigned
    pub equipa: Option<i64>,

    /// Languages spoken, as listed on the volunteer sheet
    pub linguas: Vec<String>,

    /// Volunteering hours accumulated across all projects.
    /// Derived from the hours table on read; written through
    /// `add_horas`, never through the volunteer record itself.
    pub horas: i64,
}

impl Voluntario {
    pub fn new(nr: i64, nome: String, contacto: String) -> Self {
        Self {
            nr,
            nome,
            contacto,
            data_nascimento: None,
            equipa: None,
            linguas: Vec::new(),
            horas: 0,
        }
    }

    /// First and last name, for team rosters
    pub fn nome_curto(&self) -> String {
        let mut parts = self.nome.split_whitespace();
        match (parts.next(), parts.last()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => String::new(),
        }
    }
}
