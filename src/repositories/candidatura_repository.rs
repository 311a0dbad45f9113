// src/repositories/candidatura_repository.rs
//
// Housing-application persistence
//
// The application's `membros` list is hydrated from the members table on
// every read; member rows are owned by the member repository.

use rusqlite::{params, Connection, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::{Candidatura, EstadoCandidatura};
use crate::error::{AppError, AppResult};

pub struct SqliteCandidaturaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCandidaturaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_candidatura(row: &Row) -> Result<Candidatura, rusqlite::Error> {
        let estado_str: String = row.get("estado")?;
        let estado =
            EstadoCandidatura::parse(&estado_str).ok_or(rusqlite::Error::InvalidQuery)?;

        let data_submissao: String = row.get("data_submissao")?;
        let data_decisao: Option<String> = row.get("data_decisao")?;

        Ok(Candidatura {
            nr: row.get("nr")?,
            estado,
            descricao: row.get("descricao")?,
            data_submissao: super::parse_date(&data_submissao)?,
            data_decisao: super::parse_date_opt(data_decisao)?,
            funcionario_registou: row.get("funcionario_registou")?,
            funcionario_aprovou: row.get("funcionario_aprovou")?,
            membros: Vec::new(),
            representante: row.get("representante")?,
        })
    }

    fn hydrate_membros(conn: &Connection, cand: &mut Candidatura) -> AppResult<()> {
        let mut stmt =
            conn.prepare("SELECT id FROM membros WHERE candidatura = ?1 ORDER BY id")?;

        cand.membros = stmt
            .query_map(params![cand.nr], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(())
    }
}

impl Repositorio for SqliteCandidaturaRepository {
    type Chave = i64;
    type Registo = Candidatura;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM candidaturas", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM candidaturas WHERE nr = ?1)",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr: &i64) -> AppResult<Option<Candidatura>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr, estado, descricao, data_submissao, data_decisao,
                    funcionario_registou, funcionario_aprovou, representante
             FROM candidaturas WHERE nr = ?1",
        )?;

        let mut cand = match stmt.query_row(params![nr], Self::row_to_candidatura) {
            Ok(cand) => cand,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate_membros(&conn, &mut cand)?;
        Ok(Some(cand))
    }

    fn put(&self, cand: &Candidatura) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO candidaturas
                (nr, estado, descricao, data_submissao, data_decisao,
                 funcionario_registou, funcionario_aprovou, representante)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                cand.nr,
                cand.estado.as_str(),
                cand.descricao,
                super::fmt_date(&cand.data_submissao),
                super::fmt_date_opt(&cand.data_decisao),
                cand.funcionario_registou,
                cand.funcionario_aprovou,
                cand.representante
            ],
        )?;
        Ok(())
    }

    fn delete(&self, nr: &i64) -> AppResult<Option<Candidatura>> {
        let existing = self.get(nr)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            // No cascade: member rows keep their application reference
            conn.execute("DELETE FROM candidaturas WHERE nr = ?1", params![nr])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Candidatura>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr, estado, descricao, data_submissao, data_decisao,
                    funcionario_registou, funcionario_aprovou, representante
             FROM candidaturas ORDER BY nr",
        )?;

        let mut candidaturas: Vec<Candidatura> = stmt
            .query_map([], Self::row_to_candidatura)?
            .collect::<Result<Vec<_>, _>>()?;

        for cand in &mut candidaturas {
            Self::hydrate_membros(&conn, cand)?;
        }

        Ok(candidaturas)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr FROM candidaturas ORDER BY nr")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM candidaturas", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteCandidaturaRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "candidaturas", "nr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::domain::Membro;
    use crate::repositories::SqliteMembroRepository;
    use chrono::NaiveDate;

    fn candidatura(nr: i64) -> Candidatura {
        Candidatura::new(
            nr,
            "Família de quatro pessoas, casa degradada".to_string(),
            NaiveDate::from_ymd_opt(2014, 11, 2).unwrap(),
            1,
        )
    }

    #[test]
    fn test_roundtrip_with_decision_fields() {
        let repo = SqliteCandidaturaRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut c = candidatura(1);
        c.estado = EstadoCandidatura::Aprovada;
        c.data_decisao = NaiveDate::from_ymd_opt(2014, 12, 20);
        c.funcionario_registou = Some("jcaldas".to_string());
        c.funcionario_aprovou = Some("rsilva".to_string());

        repo.put(&c).unwrap();
        assert_eq!(repo.get(&1).unwrap(), Some(c));
    }

    #[test]
    fn test_membros_hydrated_from_members_table() {
        let pool = Arc::new(create_test_pool().unwrap());
        let candidaturas = SqliteCandidaturaRepository::new(Arc::clone(&pool));
        let membros = SqliteMembroRepository::new(Arc::clone(&pool));

        candidaturas.put(&candidatura(5)).unwrap();
        membros.put(&Membro::new(1, "Ana".to_string(), 5)).unwrap();
        membros.put(&Membro::new(2, "Rui".to_string(), 5)).unwrap();

        let c = candidaturas.get(&5).unwrap().unwrap();
        assert_eq!(c.membros, vec![1, 2]);
    }
}
