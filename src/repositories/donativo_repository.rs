// src/repositories/donativo_repository.rs
//
// Donation persistence
//
// The monetary/in-kind subtype is discriminated by the `tipo` column:
// 'monetario' rows carry `valor`, 'em_especie' rows carry `descricao`.

use rusqlite::{params, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::{Donativo, TipoDonativo};
use crate::error::{AppError, AppResult};

pub struct SqliteDonativoRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteDonativoRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_donativo(row: &Row) -> Result<Donativo, rusqlite::Error> {
        let data: String = row.get("data")?;
        let tipo_str: String = row.get("tipo")?;

        let tipo = match tipo_str.as_str() {
            "monetario" => TipoDonativo::Monetario {
                valor: row.get("valor")?,
            },
            "em_especie" => TipoDonativo::EmEspecie {
                descricao: row.get::<_, Option<String>>("descricao")?.unwrap_or_default(),
            },
            _ => return Err(rusqlite::Error::InvalidQuery),
        };

        Ok(Donativo {
            nr_recibo: row.get("nr_recibo")?,
            doador: row.get("doador")?,
            data: super::parse_date(&data)?,
            tipo,
        })
    }

    /// Donations made by one donor
    pub fn list_do_doador(&self, nif: &str) -> AppResult<Vec<Donativo>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr_recibo, doador, data, tipo, valor, descricao
             FROM donativos WHERE doador = ?1 ORDER BY nr_recibo",
        )?;

        let donativos: Vec<Donativo> = stmt
            .query_map(params![nif], Self::row_to_donativo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(donativos)
    }
}

impl Repositorio for SqliteDonativoRepository {
    type Chave = i64;
    type Registo = Donativo;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM donativos", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr_recibo: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM donativos WHERE nr_recibo = ?1)",
            params![nr_recibo],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr_recibo: &i64) -> AppResult<Option<Donativo>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr_recibo, doador, data, tipo, valor, descricao
             FROM donativos WHERE nr_recibo = ?1",
        )?;

        match stmt.query_row(params![nr_recibo], Self::row_to_donativo) {
            Ok(donativo) => Ok(Some(donativo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, donativo: &Donativo) -> AppResult<()> {
        let (tipo, valor, descricao) = match &donativo.tipo {
            TipoDonativo::Monetario { valor } => ("monetario", Some(*valor), None),
            TipoDonativo::EmEspecie { descricao } => {
                ("em_especie", None, Some(descricao.as_str()))
            }
        };

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO donativos (nr_recibo, doador, data, tipo, valor, descricao)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                donativo.nr_recibo,
                donativo.doador,
                super::fmt_date(&donativo.data),
                tipo,
                valor,
                descricao
            ],
        )?;
        Ok(())
    }

    fn delete(&self, nr_recibo: &i64) -> AppResult<Option<Donativo>> {
        let existing = self.get(nr_recibo)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute(
                "DELETE FROM donativos WHERE nr_recibo = ?1",
                params![nr_recibo],
            )?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Donativo>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT nr_recibo, doador, data, tipo, valor, descricao
             FROM donativos ORDER BY nr_recibo",
        )?;

        let donativos: Vec<Donativo> = stmt
            .query_map([], Self::row_to_donativo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(donativos)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr_recibo FROM donativos ORDER BY nr_recibo")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM donativos", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteDonativoRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "donativos", "nr_recibo")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::NaiveDate;

    fn data() -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 12, 30).unwrap()
    }

    #[test]
    fn test_both_subtypes_roundtrip() {
        let repo = SqliteDonativoRepository::new(Arc::new(create_test_pool().unwrap()));

        let monetario = Donativo::new(
            1,
            "500100200".to_string(),
            data(),
            TipoDonativo::Monetario { valor: 50.0 },
        );
        let em_especie = Donativo::new(
            2,
            "500100200".to_string(),
            data(),
            TipoDonativo::EmEspecie {
                descricao: "ferramentas".to_string(),
            },
        );

        repo.put(&monetario).unwrap();
        repo.put(&em_especie).unwrap();

        assert_eq!(repo.get(&1).unwrap(), Some(monetario));
        assert_eq!(repo.get(&2).unwrap(), Some(em_especie));
    }

    #[test]
    fn test_list_do_doador() {
        let repo = SqliteDonativoRepository::new(Arc::new(create_test_pool().unwrap()));

        for (nr, nif) in [(1, "111"), (2, "222"), (3, "111")] {
            repo.put(&Donativo::new(
                nr,
                nif.to_string(),
                data(),
                TipoDonativo::Monetario { valor: 10.0 },
            ))
            .unwrap();
        }

        let do_111 = repo.list_do_doador("111").unwrap();
        assert_eq!(
            do_111.iter().map(|d| d.nr_recibo).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
