// src/repositories/doador_repository.rs
//
// Donor persistence
//
// The donor's `donativos` set is hydrated from the donations table on every
// read. `put` writes only the donor's own columns; donation references are
// owned by the donations table.

use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::Repositorio;
use crate::db::ConnectionPool;
use crate::domain::Doador;
use crate::error::{AppError, AppResult};

pub struct SqliteDoadorRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteDoadorRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_doador(row: &Row) -> Result<Doador, rusqlite::Error> {
        Ok(Doador {
            nif: row.get("nif")?,
            nome: row.get("nome")?,
            contacto: row.get("contacto")?,
            donativos: BTreeSet::new(),
        })
    }

    fn hydrate_donativos(conn: &Connection, doador: &mut Doador) -> AppResult<()> {
        let mut stmt =
            conn.prepare("SELECT nr_recibo FROM donativos WHERE doador = ?1 ORDER BY nr_recibo")?;

        doador.donativos = stmt
            .query_map(params![doador.nif], |row| row.get(0))?
            .collect::<Result<BTreeSet<i64>, _>>()?;

        Ok(())
    }
}

impl Repositorio for SqliteDoadorRepository {
    type Chave = String;
    type Registo = Doador;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM doadores", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nif: &String) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM doadores WHERE nif = ?1)",
            params![nif],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nif: &String) -> AppResult<Option<Doador>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nif, nome, contacto FROM doadores WHERE nif = ?1")?;

        let mut doador = match stmt.query_row(params![nif], Self::row_to_doador) {
            Ok(doador) => doador,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate_donativos(&conn, &mut doador)?;
        Ok(Some(doador))
    }

    fn put(&self, doador: &Doador) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO doadores (nif, nome, contacto) VALUES (?1, ?2, ?3)",
            params![doador.nif, doador.nome, doador.contacto],
        )?;
        Ok(())
    }

    fn delete(&self, nif: &String) -> AppResult<Option<Doador>> {
        let existing = self.get(nif)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            // No cascade: the donor's donations stay behind
            conn.execute("DELETE FROM doadores WHERE nif = ?1", params![nif])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Doador>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nif, nome, contacto FROM doadores ORDER BY nif")?;

        let mut doadores: Vec<Doador> = stmt
            .query_map([], Self::row_to_doador)?
            .collect::<Result<Vec<_>, _>>()?;

        for doador in &mut doadores {
            Self::hydrate_donativos(&conn, doador)?;
        }

        Ok(doadores)
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nif FROM doadores ORDER BY nif")?;

        let nifs: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nifs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM doadores", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::domain::{Donativo, TipoDonativo};
    use crate::repositories::SqliteDonativoRepository;
    use chrono::NaiveDate;

    #[test]
    fn test_donativos_are_hydrated_from_donations_table() {
        let pool = Arc::new(create_test_pool().unwrap());
        let doadores = SqliteDoadorRepository::new(Arc::clone(&pool));
        let donativos = SqliteDonativoRepository::new(Arc::clone(&pool));

        doadores
            .put(&Doador::new(
                "500100200".to_string(),
                "Maria Santos".to_string(),
                "maria@example.pt".to_string(),
            ))
            .unwrap();

        donativos
            .put(&Donativo::new(
                7,
                "500100200".to_string(),
                NaiveDate::from_ymd_opt(2014, 12, 30).unwrap(),
                TipoDonativo::Monetario { valor: 25.0 },
            ))
            .unwrap();

        let doador = doadores.get(&"500100200".to_string()).unwrap().unwrap();
        assert!(doador.donativos.contains(&7));
    }

    #[test]
    fn test_get_absent_is_none() {
        let doadores = SqliteDoadorRepository::new(Arc::new(create_test_pool().unwrap()));
        assert!(doadores.get(&"999".to_string()).unwrap().is_none());
    }
}
