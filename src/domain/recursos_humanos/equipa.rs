use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A team of volunteers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipa {
    pub id: i64,

    pub nome: String,

    /// Country the team's volunteers come from
    pub pais_origem: String,

    pub observacoes: String,

    /// Nr of the volunteer leading the team.
    /// May dangle after that volunteer is removed; lookups surface NotFound.
    pub chefe: i64,

    /// Nrs of the volunteers assigned to this team.
    /// Hydrated from the volunteers table on read.
    pub voluntarios: BTreeSet<i64>,
}

impl Equipa {
    pub fn new(id: i64, nome: String, pais_origem: String, chefe: i64) -> Self {
        Self {
            id,
            nome,
            pais_origem,
            observacoes: String::new(),
            chefe,
            voluntarios: BTreeSet::new(),
        }
    }

    /// Number of volunteers currently assigned
    pub fn tamanho(&self) -> usize {
        self.voluntarios.len()
    }
}
