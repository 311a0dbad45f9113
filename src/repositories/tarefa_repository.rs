// src/repositories/tarefa_repository.rs
//
// Task persistence
//
// `material_gasto` lives in the tarefa_materiais join table and is rewritten
// together with the task row inside one transaction.

use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Tarefa;
use crate::error::{AppError, AppResult};

pub struct SqliteTarefaRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteTarefaRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_tarefa(row: &Row) -> Result<Tarefa, rusqlite::Error> {
        let data_inicio: Option<String> = row.get("data_inicio")?;
        let data_fim: Option<String> = row.get("data_fim")?;

        Ok(Tarefa {
            id: row.get("id")?,
            projeto: row.get("projeto")?,
            designacao: row.get("designacao")?,
            descricao: row.get("descricao")?,
            data_inicio: super::parse_date_opt(data_inicio)?,
            data_fim: super::parse_date_opt(data_fim)?,
            material_gasto: BTreeMap::new(),
        })
    }

    fn hydrate_material(conn: &Connection, tarefa: &mut Tarefa) -> AppResult<()> {
        let mut stmt = conn.prepare(
            "SELECT material, quantidade FROM tarefa_materiais WHERE tarefa = ?1",
        )?;

        tarefa.material_gasto = stmt
            .query_map(params![tarefa.id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<BTreeMap<i64, i64>, _>>()?;

        Ok(())
    }

    /// Tasks opened under one project
    pub fn list_do_projeto(&self, projeto: i64) -> AppResult<Vec<Tarefa>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, projeto, designacao, descricao, data_inicio, data_fim
             FROM tarefas WHERE projeto = ?1 ORDER BY id",
        )?;

        let mut tarefas: Vec<Tarefa> = stmt
            .query_map(params![projeto], Self::row_to_tarefa)?
            .collect::<Result<Vec<_>, _>>()?;

        for tarefa in &mut tarefas {
            Self::hydrate_material(&conn, tarefa)?;
        }

        Ok(tarefas)
    }
}

impl Repositorio for SqliteTarefaRepository {
    type Chave = i64;
    type Registo = Tarefa;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM tarefas", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, id: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tarefas WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, id: &i64) -> AppResult<Option<Tarefa>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, projeto, designacao, descricao, data_inicio, data_fim
             FROM tarefas WHERE id = ?1",
        )?;

        let mut tarefa = match stmt.query_row(params![id], Self::row_to_tarefa) {
            Ok(tarefa) => tarefa,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        Self::hydrate_material(&conn, &mut tarefa)?;
        Ok(Some(tarefa))
    }

    fn put(&self, tarefa: &Tarefa) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO tarefas
                (id, projeto, designacao, descricao, data_inicio, data_fim)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                tarefa.id,
                tarefa.projeto,
                tarefa.designacao,
                tarefa.descricao,
                super::fmt_date_opt(&tarefa.data_inicio),
                super::fmt_date_opt(&tarefa.data_fim)
            ],
        )?;

        tx.execute(
            "DELETE FROM tarefa_materiais WHERE tarefa = ?1",
            params![tarefa.id],
        )?;
        for (material, quantidade) in &tarefa.material_gasto {
            tx.execute(
                "INSERT INTO tarefa_materiais (tarefa, material, quantidade)
                 VALUES (?1, ?2, ?3)",
                params![tarefa.id, material, quantidade],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: &i64) -> AppResult<Option<Tarefa>> {
        let existing = self.get(id)?;
        if existing.is_some() {
            let mut conn = self.pool.get()?;
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tarefas WHERE id = ?1", params![id])?;
            tx.execute("DELETE FROM tarefa_materiais WHERE tarefa = ?1", params![id])?;
            tx.commit()?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Tarefa>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, projeto, designacao, descricao, data_inicio, data_fim
             FROM tarefas ORDER BY id",
        )?;

        let mut tarefas: Vec<Tarefa> = stmt
            .query_map([], Self::row_to_tarefa)?
            .collect::<Result<Vec<_>, _>>()?;

        for tarefa in &mut tarefas {
            Self::hydrate_material(&conn, tarefa)?;
        }

        Ok(tarefas)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM tarefas ORDER BY id")?;

        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn clear(&self) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tarefas", [])?;
        tx.execute("DELETE FROM tarefa_materiais", [])?;
        tx.commit()?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteTarefaRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "tarefas", "id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use chrono::NaiveDate;

    #[test]
    fn test_material_gasto_roundtrip_and_rewrite() {
        let repo = SqliteTarefaRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut t = Tarefa::new(1, "Fundações".to_string(), "Escavação e betão".to_string());
        t.material_gasto.insert(10, 40);
        t.material_gasto.insert(11, 3);
        repo.put(&t).unwrap();

        assert_eq!(repo.get(&1).unwrap(), Some(t.clone()));

        // Edit replaces the whole mapping
        t.material_gasto.clear();
        t.material_gasto.insert(10, 55);
        repo.put(&t).unwrap();

        let lido = repo.get(&1).unwrap().unwrap();
        assert_eq!(lido.material_gasto, [(10, 55)].into_iter().collect());
    }

    #[test]
    fn test_finished_state_survives_roundtrip() {
        let repo = SqliteTarefaRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut t = Tarefa::new(2, "Telhado".to_string(), String::new());
        assert!(!t.terminada());
        t.data_fim = NaiveDate::from_ymd_opt(2014, 12, 29);
        repo.put(&t).unwrap();

        assert!(repo.get(&2).unwrap().unwrap().terminada());
    }

    #[test]
    fn test_list_do_projeto() {
        let repo = SqliteTarefaRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut a = Tarefa::new(1, "A".to_string(), String::new());
        a.projeto = Some(7);
        let mut b = Tarefa::new(2, "B".to_string(), String::new());
        b.projeto = Some(8);
        repo.put(&a).unwrap();
        repo.put(&b).unwrap();

        let do_7 = repo.list_do_projeto(7).unwrap();
        assert_eq!(do_7.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }
}
