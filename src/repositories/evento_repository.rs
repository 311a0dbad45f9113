// src/repositories/evento_repository.rs
//
// Event persistence

use rusqlite::{params, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Evento;
use crate::error::{AppError, AppResult};

pub struct SqliteEventoRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteEventoRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_evento(row: &Row) -> Result<Evento, rusqlite::Error> {
        let data: String = row.get("data")?;
        Ok(Evento {
            nr: row.get("nr")?,
            nome: row.get("nome")?,
            data: super::parse_date(&data)?,
        })
    }
}

impl Repositorio for SqliteEventoRepository {
    type Chave = i64;
    type Registo = Evento;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM eventos", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM eventos WHERE nr = ?1)",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr: &i64) -> AppResult<Option<Evento>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr, nome, data FROM eventos WHERE nr = ?1")?;

        match stmt.query_row(params![nr], Self::row_to_evento) {
            Ok(evento) => Ok(Some(evento)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, evento: &Evento) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO eventos (nr, nome, data) VALUES (?1, ?2, ?3)",
            params![evento.nr, evento.nome, super::fmt_date(&evento.data)],
        )?;
        Ok(())
    }

    fn delete(&self, nr: &i64) -> AppResult<Option<Evento>> {
        let existing = self.get(nr)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute("DELETE FROM eventos WHERE nr = ?1", params![nr])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Evento>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr, nome, data FROM eventos ORDER BY nr")?;

        let eventos: Vec<Evento> = stmt
            .query_map([], Self::row_to_evento)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(eventos)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr FROM eventos ORDER BY nr")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM eventos", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteEventoRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "eventos", "nr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::NaiveDate;

    fn repo() -> SqliteEventoRepository {
        SqliteEventoRepository::new(Arc::new(create_test_pool().unwrap()))
    }

    fn evento(nr: i64) -> Evento {
        Evento::new(
            nr,
            format!("Angariação {}", nr),
            NaiveDate::from_ymd_opt(2014, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_put_get_roundtrip() {
        let repo = repo();
        let e = evento(1);

        repo.put(&e).unwrap();

        assert!(repo.contains(&1).unwrap());
        assert_eq!(repo.get(&1).unwrap(), Some(e));
    }

    #[test]
    fn test_put_replaces_existing_row() {
        let repo = repo();
        repo.put(&evento(1)).unwrap();

        let mut alterado = evento(1);
        alterado.nome = "Jantar solidário".to_string();
        repo.put(&alterado).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(&1).unwrap().unwrap().nome, "Jantar solidário");
    }

    #[test]
    fn test_delete_returns_removed_record_then_none() {
        let repo = repo();
        repo.put(&evento(2)).unwrap();

        let removed = repo.delete(&2).unwrap();
        assert_eq!(removed.map(|e| e.nr), Some(2));

        // Second delete is a no-op
        assert!(repo.delete(&2).unwrap().is_none());
    }

    #[test]
    fn test_next_key_is_max_plus_one_not_gap_filling() {
        let repo = repo();
        assert_eq!(repo.next_key().unwrap(), 1);

        for nr in [1, 3, 7] {
            repo.put(&evento(nr)).unwrap();
        }
        assert_eq!(repo.next_key().unwrap(), 8);
    }

    #[test]
    fn test_keys_enumerates_all() {
        let repo = repo();
        for nr in [5, 2, 9] {
            repo.put(&evento(nr)).unwrap();
        }
        assert_eq!(repo.keys().unwrap(), vec![2, 5, 9]);
    }
}
