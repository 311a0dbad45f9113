// src/repositories/voluntario_repository.rs
//
// Volunteer persistence
//
// `linguas` is a JSON array column. Accumulated volunteering hours live in
// the horas_voluntariado table, keyed by (projeto, voluntario); the
// volunteer's `horas` field is the SUM over that table, hydrated on read.

use rusqlite::{params, Connection, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Voluntario;
use crate::error::{AppError, AppResult};

pub struct SqliteVoluntarioRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteVoluntarioRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_voluntario(row: &Row) -> Result<Voluntario, rusqlite::Error> {
        let data_nascimento: Option<String> = row.get("data_nascimento")?;
        let linguas_json: String = row.get("linguas")?;
        let linguas: Vec<String> = serde_json::from_str(&linguas_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Voluntario {
            nr: row.get("nr")?,
            nome: row.get("nome")?,
            contacto: row.get("contacto")?,
            data_nascimento: super::parse_date_opt(data_nascimento)?,
            equipa: row.get("equipa")?,
            linguas,
            horas: 0,
        })
    }

    fn hydrate_horas(conn: &Connection, voluntario: &mut Voluntario) -> AppResult<()> {
        voluntario.horas = conn.query_row(
            "SELECT COALESCE(SUM(horas), 0) FROM horas_voluntariado WHERE voluntario = ?1",
            params![voluntario.nr],
            |row| row.get(0),
        )?;
        Ok(())
    }

    /// Volunteers assigned to one team; `None` selects the unassigned ones
    pub fn list_por_equipa(&self, equipa: Option<i64>) -> AppResult<Vec<Voluntario>> {
        let conn = self.pool.get()?;
        let sql = match equipa {
            Some(_) => {
                "SELECT nr, nome, contacto, data_nascimento, equipa, linguas
                 FROM voluntarios WHERE equipa = ?1 ORDER BY nr"
            }
            None => {
                "SELECT nr, nome, contacto, data_nascimento, equipa, linguas
                 FROM voluntarios WHERE equipa IS NULL ORDER BY nr"
            }
        };
        let mut stmt = conn.prepare(sql)?;

        let mut voluntarios: Vec<Voluntario> = match equipa {
            Some(id) => stmt
                .query_map(params![id], Self::row_to_voluntario)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::row_to_voluntario)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        for voluntario in &mut voluntarios {
            Self::hydrate_horas(&conn, voluntario)?;
        }

        Ok(voluntarios)
    }

    /// Accumulate volunteering hours for (projeto, voluntario)
    pub fn add_horas(&self, projeto: i64, voluntario: i64, horas: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO horas_voluntariado (projeto, voluntario, horas)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(projeto, voluntario) DO UPDATE SET horas = horas + excluded.horas",
            params![projeto, voluntario, horas],
        )?;
        Ok(())
    }

    /// Total hours a volunteer has worked, across all projects
    pub fn horas_totais(&self, nr: i64) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(horas), 0) FROM horas_voluntariado WHERE voluntario = ?1",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

impl Repositorio for SqliteVoluntarioRepository {
    type Chave = i64;
    type Registo = Voluntario;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM voluntarios", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM voluntarios WHERE nr = ?1)",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr: &i64) -> AppResult<Option<Voluntario>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr, nome, contacto, data_nascimento, equipa, linguas
             FROM voluntarios WHERE nr = ?1",
        )?;

        let mut voluntario = match stmt.query_row(params![nr], Self::row_to_voluntario) {
            Ok(voluntario) => voluntario,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate_horas(&conn, &mut voluntario)?;
        Ok(Some(voluntario))
    }

    fn put(&self, voluntario: &Voluntario) -> AppResult<()> {
        let linguas_json = serde_json::to_string(&voluntario.linguas)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO voluntarios
                (nr, nome, contacto, data_nascimento, equipa, linguas)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                voluntario.nr,
                voluntario.nome,
                voluntario.contacto,
                super::fmt_date_opt(&voluntario.data_nascimento),
                voluntario.equipa,
                linguas_json
            ],
        )?;
        Ok(())
    }

    fn delete(&self, nr: &i64) -> AppResult<Option<Voluntario>> {
        let existing = self.get(nr)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            // Hours records and team leader references are left behind
            conn.execute("DELETE FROM voluntarios WHERE nr = ?1", params![nr])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Voluntario>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr, nome, contacto, data_nascimento, equipa, linguas
             FROM voluntarios ORDER BY nr",
        )?;

        let mut voluntarios: Vec<Voluntario> = stmt
            .query_map([], Self::row_to_voluntario)?
            .collect::<Result<Vec<_>, _>>()?;

        for voluntario in &mut voluntarios {
            Self::hydrate_horas(&conn, voluntario)?;
        }

        Ok(voluntarios)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr FROM voluntarios ORDER BY nr")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM voluntarios", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteVoluntarioRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "voluntarios", "nr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    fn repo() -> SqliteVoluntarioRepository {
        SqliteVoluntarioRepository::new(Arc::new(create_test_pool().unwrap()))
    }

    fn voluntario(nr: i64, nome: &str) -> Voluntario {
        Voluntario::new(nr, nome.to_string(), "910000000".to_string())
    }

    #[test]
    fn test_roundtrip_with_linguas() {
        let repo = repo();

        let mut v = voluntario(1, "Anna Lindqvist");
        v.linguas = vec!["sueco".to_string(), "inglês".to_string()];
        repo.put(&v).unwrap();

        assert_eq!(repo.get(&1).unwrap(), Some(v));
    }

    #[test]
    fn test_add_horas_accumulates_per_project() {
        let repo = repo();
        repo.put(&voluntario(1, "João")).unwrap();

        repo.add_horas(10, 1, 5).unwrap();
        repo.add_horas(10, 1, 3).unwrap();
        repo.add_horas(11, 1, 2).unwrap();

        assert_eq!(repo.horas_totais(1).unwrap(), 10);
        assert_eq!(repo.get(&1).unwrap().unwrap().horas, 10);
    }

    #[test]
    fn test_list_por_equipa_none_selects_unassigned() {
        let repo = repo();

        let mut com_equipa = voluntario(1, "A");
        com_equipa.equipa = Some(3);
        repo.put(&com_equipa).unwrap();
        repo.put(&voluntario(2, "B")).unwrap();

        let sem = repo.list_por_equipa(None).unwrap();
        assert_eq!(sem.iter().map(|v| v.nr).collect::<Vec<_>>(), vec![2]);

        let da_3 = repo.list_por_equipa(Some(3)).unwrap();
        assert_eq!(da_3.iter().map(|v| v.nr).collect::<Vec<_>>(), vec![1]);
    }
}
