use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered donor, identified by tax number (NIF)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doador {
    /// Tax identification number, the natural key
    pub nif: String,

    pub nome: String,

    pub contacto: String,

    /// Receipt numbers of this donor's donations.
    /// Hydrated from the donations table on read; never written back
    /// through the donor record itself.
    pub donativos: BTreeSet<i64>,
}

impl Doador {
    pub fn new(nif: String, nome: String, contacto: String) -> Self {
        Self {
            nif,
            nome,
            contacto,
            donativos: BTreeSet::new(),
        }
    }
}
