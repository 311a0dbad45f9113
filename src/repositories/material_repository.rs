// src/repositories/material_repository.rs
//
// Material persistence

use rusqlite::{params, Row};
use std::sync::Arc;

use super::{ChaveSequencial, Repositorio};
use crate::db::ConnectionPool;
use crate::domain::Material;
use crate::error::{AppError, AppResult};

pub struct SqliteMaterialRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMaterialRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_material(row: &Row) -> Result<Material, rusqlite::Error> {
        Ok(Material {
            id: row.get("id")?,
            nome: row.get("nome")?,
            descricao: row.get("descricao")?,
            quantidade: row.get("quantidade")?,
        })
    }
}

impl Repositorio for SqliteMaterialRepository {
    type Chave = i64;
    type Registo = Material;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM materiais", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, id: &i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM materiais WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, id: &i64) -> AppResult<Option<Material>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, nome, descricao, quantidade FROM materiais WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_material) {
            Ok(material) => Ok(Some(material)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, material: &Material) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO materiais (id, nome, descricao, quantidade)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                material.id,
                material.nome,
                material.descricao,
                material.quantidade
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &i64) -> AppResult<Option<Material>> {
        let existing = self.get(id)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute("DELETE FROM materiais WHERE id = ?1", params![id])?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Material>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, nome, descricao, quantidade FROM materiais ORDER BY id")?;

        let materiais: Vec<Material> = stmt
            .query_map([], Self::row_to_material)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(materiais)
    }

    fn keys(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id FROM materiais ORDER BY id")?;

        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM materiais", [])?;
        Ok(())
    }
}

impl ChaveSequencial for SqliteMaterialRepository {
    fn next_key(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        super::next_sequential_key(&conn, "materiais", "id")
    }
}
