// src/session/import.rs
//
// Seam for the volunteer-sheet importer.
//
// The actual document parser is an external collaborator; all it needs from
// this crate is a draft shape to fill in and a facade call that reserves
// keys and saves the resulting volunteers.

use chrono::NaiveDate;

use crate::error::AppResult;

/// A parsed volunteer sheet, before a key is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct FichaVoluntario {
    pub nome: String,
    pub contacto: String,
    pub data_nascimento: Option<NaiveDate>,
    pub linguas: Vec<String>,
}

/// Source of parsed volunteer sheets, consumed one at a time.
pub trait FonteFichas {
    /// Next sheet, or `None` when the source is exhausted.
    fn proxima(&mut self) -> AppResult<Option<FichaVoluntario>>;
}

/// Convenience source over an in-memory batch (used by tests and by
/// importers that parse everything up front).
pub struct FichasEmMemoria {
    fichas: std::vec::IntoIter<FichaVoluntario>,
}

impl FichasEmMemoria {
    pub fn new(fichas: Vec<FichaVoluntario>) -> Self {
        Self {
            fichas: fichas.into_iter(),
        }
    }
}

impl FonteFichas for FichasEmMemoria {
    fn proxima(&mut self) -> AppResult<Option<FichaVoluntario>> {
        Ok(self.fichas.next())
    }
}
