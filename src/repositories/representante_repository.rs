// src/repositories/representante_repository.rs
//
// Family-representative persistence

use rusqlite::{params, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Representante;
use crate::error::{AppError, AppResult};

pub struct SqliteRepresentanteRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteRepresentanteRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_representante(row: &Row) -> Result<Representante, rusqlite::Error> {
        Ok(Representante {
            nr: row.get("nr")?,
            nome: row.get("nome")?,
            contacto: row.get("contacto")?,
        })
    }
}

impl Repositorio for SqliteRepresentanteRepository {
    type Chave = i64;
    type Registo = Representante;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM representantes", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM representantes WHERE nr = ?1)",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr: &i64) -> AppResult<Option<Representante>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT nr, nome, contacto FROM representantes WHERE nr = ?1")?;

        match stmt.query_row(params![nr], Self::row_to_representante) {
            Ok(rep) => Ok(Some(rep)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, rep: &Representante) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO representantes (nr, nome, contacto) VALUES (?1, ?2, ?3)",
            params![rep.nr, rep.nome, rep.contacto],
        )?;
        Ok(())
    }

    fn delete(&self, nr: &i64) -> AppResult<Option<Representante>> {
        let existing = self.get(nr)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute("DELETE FROM representantes WHERE nr = ?1", params![nr])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Representante>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr, nome, contacto FROM representantes ORDER BY nr")?;

        let reps: Vec<Representante> = stmt
            .query_map([], Self::row_to_representante)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reps)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr FROM representantes ORDER BY nr")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM representantes", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteRepresentanteRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "representantes", "nr")
    }
}
