// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO cross-repository calls
// - Explicit SQL only
//
// Each repository presents one table as a keyed collection. Existence gates
// and referential preconditions live in the session layer.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::AppResult;

pub mod candidatura_repository;
pub mod doador_repository;
pub mod donativo_repository;
pub mod equipa_repository;
pub mod evento_repository;
pub mod funcionario_repository;
pub mod material_repository;
pub mod membro_repository;
pub mod projeto_repository;
pub mod representante_repository;
pub mod tarefa_repository;
pub mod voluntario_repository;

pub use candidatura_repository::SqliteCandidaturaRepository;
pub use doador_repository::SqliteDoadorRepository;
pub use donativo_repository::SqliteDonativoRepository;
pub use equipa_repository::SqliteEquipaRepository;
pub use evento_repository::SqliteEventoRepository;
pub use funcionario_repository::SqliteFuncionarioRepository;
pub use material_repository::SqliteMaterialRepository;
pub use membro_repository::SqliteMembroRepository;
pub use projeto_repository::SqliteProjetoRepository;
pub use representante_repository::SqliteRepresentanteRepository;
pub use tarefa_repository::SqliteTarefaRepository;
pub use voluntario_repository::SqliteVoluntarioRepository;

/// One relational table presented as a mapping from key to record.
///
/// `get` returns `None` as the not-found sentinel; the session converts it
/// into a typed NotFound error. `put` is a destructive replace (atomic
/// upsert, join-table rewrites included). `delete` fetches then deletes and
/// hands back the removed record; deleting an absent key is a no-op.
pub trait Repositorio: Send + Sync {
    type Chave;
    type Registo;

    fn count(&self) -> AppResult<usize>;

    fn is_empty(&self) -> AppResult<bool> {
        Ok(self.count()? == 0)
    }

    fn contains(&self, chave: &Self::Chave) -> AppResult<bool>;

    fn get(&self, chave: &Self::Chave) -> AppResult<Option<Self::Registo>>;

    fn put(&self, registo: &Self::Registo) -> AppResult<()>;

    fn delete(&self, chave: &Self::Chave) -> AppResult<Option<Self::Registo>>;

    fn list(&self) -> AppResult<Vec<Self::Registo>>;

    fn keys(&self) -> AppResult<Vec<Self::Chave>>;

    fn clear(&self) -> AppResult<()>;
}

/// Surrogate-key generation for integer-keyed repositories.
///
/// Policy: `max(existing) + 1`, or 1 when the table is empty. Gaps left by
/// removals are never reused. Not safe under concurrent generation; the
/// application is single-threaded (see DESIGN.md).
pub trait ChaveSequencial {
    fn next_key(&self) -> AppResult<i64>;
}

/// `COALESCE(MAX(key), 0) + 1` in a single statement
pub(crate) fn next_sequential_key(
    conn: &Connection,
    table: &str,
    key_col: &str,
) -> AppResult<i64> {
    let next: i64 = conn.query_row(
        &format!("SELECT COALESCE(MAX({}), 0) + 1 FROM {}", key_col, table),
        [],
        |row| row.get(0),
    )?;
    Ok(next)
}

/// Map an ISO-8601 date column, as a rusqlite error for query_map compatibility
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn fmt_date_opt(d: &Option<NaiveDate>) -> Option<String> {
    d.as_ref().map(fmt_date)
}

pub(crate) fn parse_date_opt(s: Option<String>) -> Result<Option<NaiveDate>, rusqlite::Error> {
    s.as_deref().map(parse_date).transpose()
}
