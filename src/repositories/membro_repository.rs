// src/repositories/membro_repository.rs
//
// Family-member persistence

use rusqlite::{params, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Membro;
use crate::error::{AppError, AppResult};

pub struct SqliteMembroRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMembroRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_membro(row: &Row) -> Result<Membro, rusqlite::Error> {
        Ok(Membro {
            id: row.get("id")?,
            nome: row.get("nome")?,
            candidatura: row.get("candidatura")?,
        })
    }

    /// Members belonging to one application
    pub fn list_da_candidatura(&self, candidatura: i64) -> AppResult<Vec<Membro>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, nome, candidatura FROM membros WHERE candidatura = ?1 ORDER BY id",
        )?;

        let membros: Vec<Membro> = stmt
            .query_map(params![candidatura], Self::row_to_membro)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(membros)
    }
}

impl Repositorio for SqliteMembroRepository {
    type Chave = i64;
    type Registo = Membro;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM membros", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, id: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM membros WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, id: &i64) -> AppResult<Option<Membro>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, nome, candidatura FROM membros WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_membro) {
            Ok(membro) => Ok(Some(membro)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, membro: &Membro) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO membros (id, nome, candidatura) VALUES (?1, ?2, ?3)",
            params![membro.id, membro.nome, membro.candidatura],
        )?;
        Ok(())
    }

    fn delete(&self, id: &i64) -> AppResult<Option<Membro>> {
        let existing = self.get(id)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute("DELETE FROM membros WHERE id = ?1", params![id])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Membro>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, nome, candidatura FROM membros ORDER BY id")?;

        let membros: Vec<Membro> = stmt
            .query_map([], Self::row_to_membro)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(membros)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM membros ORDER BY id")?;

        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM membros", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteMembroRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "membros", "id")
    }
}
