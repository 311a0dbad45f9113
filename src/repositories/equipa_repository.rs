// src/repositories/equipa_repository.rs
//
// Team persistence
//
// Team membership is the `equipa` column on the volunteers table; the
// `voluntarios` set is hydrated from there on every read. Removing a
// volunteer does not touch team rows, so `chefe` can dangle (historical
// behavior, kept on purpose; see DESIGN.md).

use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Equipa;
use crate::error::{AppError, AppResult};

pub struct SqliteEquipaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteEquipaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_equipa(row: &Row) -> Result<Equipa, rusqlite::Error> {
        Ok(Equipa {
            id: row.get("id")?,
            nome: row.get("nome")?,
            pais_origem: row.get("pais_origem")?,
            observacoes: row.get("observacoes")?,
            chefe: row.get("chefe")?,
            voluntarios: BTreeSet::new(),
        })
    }

    fn hydrate_voluntarios(conn: &Connection, equipa: &mut Equipa) -> AppResult<()> {
        let mut stmt =
            conn.prepare("SELECT nr FROM voluntarios WHERE equipa = ?1 ORDER BY nr")?;

        equipa.voluntarios = stmt
            .query_map(params![equipa.id], |row| row.get(0))?
            .collect::<Result<BTreeSet<i64>, _>>()?;

        Ok(())
    }
}

impl Repositorio for SqliteEquipaRepository {
    type Chave = i64;
    type Registo = Equipa;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM equipas", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, id: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM equipas WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, id: &i64) -> AppResult<Option<Equipa>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, nome, pais_origem, observacoes, chefe FROM equipas WHERE id = ?1",
        )?;

        let mut equipa = match stmt.query_row(params![id], Self::row_to_equipa) {
            Ok(equipa) => equipa,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate_voluntarios(&conn, &mut equipa)?;
        Ok(Some(equipa))
    }

    fn put(&self, equipa: &Equipa) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO equipas (id, nome, pais_origem, observacoes, chefe)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                equipa.id,
                equipa.nome,
                equipa.pais_origem,
                equipa.observacoes,
                equipa.chefe
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &i64) -> AppResult<Option<Equipa>> {
        let existing = self.get(id)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            // Volunteers keep their team reference; no pruning
            conn.execute("DELETE FROM equipas WHERE id = ?1", params![id])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Equipa>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare("SELECT id, nome, pais_origem, observacoes, chefe FROM equipas ORDER BY id")?;

        let mut equipas: Vec<Equipa> = stmt
            .query_map([], Self::row_to_equipa)?
            .collect::<Result<Vec<_>, _>>()?;

        for equipa in &mut equipas {
            Self::hydrate_voluntarios(&conn, equipa)?;
        }

        Ok(equipas)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM equipas ORDER BY id")?;

        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM equipas", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteEquipaRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "equipas", "id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::domain::Voluntario;
    use crate::repositories::SqliteVoluntarioRepository;

    #[test]
    fn test_voluntarios_hydrated_from_volunteers_table() {
        let pool = Arc::new(create_test_pool().unwrap());
        let equipas = SqliteEquipaRepository::new(Arc::clone(&pool));
        let voluntarios = SqliteVoluntarioRepository::new(Arc::clone(&pool));

        equipas
            .put(&Equipa::new(
                1,
                "Equipa Norte".to_string(),
                "Portugal".to_string(),
                10,
            ))
            .unwrap();

        let mut v = Voluntario::new(10, "João Pires".to_string(), "912".to_string());
        v.equipa = Some(1);
        voluntarios.put(&v).unwrap();

        let e = equipas.get(&1).unwrap().unwrap();
        assert_eq!(e.voluntarios, [10].into_iter().collect());
        assert_eq!(e.tamanho(), 1);
    }
}
