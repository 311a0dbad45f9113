// src/repositories/projeto_repository.rs
//
// Construction-project persistence
//
// `materiais` lives in the projeto_materiais join table and is rewritten
// together with the project row inside one transaction. `tarefas` is
// hydrated from the tasks table; task rows are owned by the task repository.

use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Projeto;
use crate::error::{AppError, AppResult};

pub struct SqliteProjetoRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteProjetoRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_projeto(row: &Row) -> Result<Projeto, rusqlite::Error> {
        let data_inicio: Option<String> = row.get("data_inicio")?;
        Ok(Projeto {
            nr: row.get("nr")?,
            nome: row.get("nome")?,
            descricao: row.get("descricao")?,
            data_inicio: super::parse_date_opt(data_inicio)?,
            tarefas: Vec::new(),
            materiais: BTreeSet::new(),
        })
    }

    fn hydrate(conn: &Connection, projeto: &mut Projeto) -> AppResult<()> {
        let mut stmt =
            conn.prepare("SELECT id FROM tarefas WHERE projeto = ?1 ORDER BY id")?;
        projeto.tarefas = stmt
            .query_map(params![projeto.nr], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT material FROM projeto_materiais WHERE projeto = ?1 ORDER BY material",
        )?;
        projeto.materiais = stmt
            .query_map(params![projeto.nr], |row| row.get(0))?
            .collect::<Result<BTreeSet<i64>, _>>()?;

        Ok(())
    }
}

impl Repositorio for SqliteProjetoRepository {
    type Chave = i64;
    type Registo = Projeto;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM projetos", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, nr: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projetos WHERE nr = ?1)",
            params![nr],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, nr: &i64) -> AppResult<Option<Projeto>> {
        let conn = self.pool.get()?;
        let mut stmt = conn
            .prepare("SELECT nr, nome, descricao, data_inicio FROM projetos WHERE nr = ?1")?;

        let mut projeto = match stmt.query_row(params![nr], Self::row_to_projeto) {
            Ok(projeto) => projeto,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate(&conn, &mut projeto)?;
        Ok(Some(projeto))
    }

    fn put(&self, projeto: &Projeto) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO projetos (nr, nome, descricao, data_inicio)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                projeto.nr,
                projeto.nome,
                projeto.descricao,
                super::fmt_date_opt(&projeto.data_inicio)
            ],
        )?;

        tx.execute(
            "DELETE FROM projeto_materiais WHERE projeto = ?1",
            params![projeto.nr],
        )?;
        for material in &projeto.materiais {
            tx.execute(
                "INSERT INTO projeto_materiais (projeto, material) VALUES (?1, ?2)",
                params![projeto.nr, material],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&self, nr: &i64) -> AppResult<Option<Projeto>> {
        let existing = self.get(nr)?;
        if existing.is_some() {
            let mut conn = self.pool.get()?;
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM projetos WHERE nr = ?1", params![nr])?;
            tx.execute(
                "DELETE FROM projeto_materiais WHERE projeto = ?1",
                params![nr],
            )?;
            tx.commit()?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Projeto>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT nr, nome, descricao, data_inicio FROM projetos ORDER BY nr")?;

        let mut projetos: Vec<Projeto> = stmt
            .query_map([], Self::row_to_projeto)?
            .collect::<Result<Vec<_>, _>>()?;

        for projeto in &mut projetos {
            Self::hydrate(&conn, projeto)?;
        }

        Ok(projetos)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT nr FROM projetos ORDER BY nr")?;

        let nrs: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(nrs)
    }

    fn clear(&self) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM projetos", [])?;
        tx.execute("DELETE FROM projeto_materiais", [])?;
        tx.commit()?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteProjetoRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "projetos", "nr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_materiais_rewritten_on_put() {
        let repo = SqliteProjetoRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut p = Projeto::new(1, "Casa Braga".to_string(), "Reabilitação".to_string());
        p.materiais.extend([10, 11, 12]);
        repo.put(&p).unwrap();

        // Replace shrinks the reserved set
        p.materiais.remove(&11);
        repo.put(&p).unwrap();

        let lido = repo.get(&1).unwrap().unwrap();
        assert_eq!(lido.materiais, [10, 12].into_iter().collect());
    }

    #[test]
    fn test_delete_clears_join_rows() {
        let repo = SqliteProjetoRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut p = Projeto::new(2, "Casa Porto".to_string(), String::new());
        p.materiais.insert(5);
        repo.put(&p).unwrap();

        repo.delete(&2).unwrap();

        // Re-inserting the same nr starts from an empty reserved set
        repo.put(&Projeto::new(2, "Casa Porto".to_string(), String::new()))
            .unwrap();
        assert!(repo.get(&2).unwrap().unwrap().materiais.is_empty());
    }
}
