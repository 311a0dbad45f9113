// src/session/mod.rs
//
// Session layer - the single entry point for all domain operations
//
// Lifecycle: Habitat (unauthenticated gateway) -> log_in -> Sessao
// (authenticated facade) -> close. Nothing but log_in is reachable before
// authentication; the type system enforces what the original left to
// convention.

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::repositories::{
    SqliteCandidaturaRepository, SqliteDoadorRepository, SqliteDonativoRepository,
    SqliteEquipaRepository, SqliteEventoRepository, SqliteFuncionarioRepository,
    SqliteMaterialRepository, SqliteMembroRepository, SqliteProjetoRepository,
    SqliteRepresentanteRepository, SqliteTarefaRepository, SqliteVoluntarioRepository,
};

pub mod habitat;
pub mod import;
pub mod sessao;

#[cfg(test)]
mod sessao_tests;

pub use habitat::{ComparacaoSimples, Habitat, LogIn, PoliticaPassword};
pub use import::{FichaVoluntario, FichasEmMemoria, FonteFichas};
pub use sessao::Sessao;

/// One repository per entity kind, all over the same pool.
pub(crate) struct Repos {
    pub doadores: SqliteDoadorRepository,
    pub donativos: SqliteDonativoRepository,
    pub eventos: SqliteEventoRepository,
    pub candidaturas: SqliteCandidaturaRepository,
    pub membros: SqliteMembroRepository,
    pub representantes: SqliteRepresentanteRepository,
    pub materiais: SqliteMaterialRepository,
    pub projetos: SqliteProjetoRepository,
    pub tarefas: SqliteTarefaRepository,
    pub equipas: SqliteEquipaRepository,
    pub funcionarios: SqliteFuncionarioRepository,
    pub voluntarios: SqliteVoluntarioRepository,
}

impl Repos {
    pub(crate) fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            doadores: SqliteDoadorRepository::new(Arc::clone(&pool)),
            donativos: SqliteDonativoRepository::new(Arc::clone(&pool)),
            eventos: SqliteEventoRepository::new(Arc::clone(&pool)),
            candidaturas: SqliteCandidaturaRepository::new(Arc::clone(&pool)),
            membros: SqliteMembroRepository::new(Arc::clone(&pool)),
            representantes: SqliteRepresentanteRepository::new(Arc::clone(&pool)),
            materiais: SqliteMaterialRepository::new(Arc::clone(&pool)),
            projetos: SqliteProjetoRepository::new(Arc::clone(&pool)),
            tarefas: SqliteTarefaRepository::new(Arc::clone(&pool)),
            equipas: SqliteEquipaRepository::new(Arc::clone(&pool)),
            funcionarios: SqliteFuncionarioRepository::new(Arc::clone(&pool)),
            voluntarios: SqliteVoluntarioRepository::new(pool),
        }
    }
}
