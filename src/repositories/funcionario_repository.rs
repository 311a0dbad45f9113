// src/repositories/funcionario_repository.rs
//
// Staff persistence
//
// Keyed by unique username. Permissions are stored as a JSON array, the
// same approach used for every list-valued column in this schema.

use rusqlite::{params, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::Repositorio;
use crate::db::ConnectionPool;
use crate::domain::Funcionario;
use crate::error::{AppError, AppResult};

pub struct SqliteFuncionarioRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteFuncionarioRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_funcionario(row: &Row) -> Result<Funcionario, rusqlite::Error> {
        let permissoes_json: String = row.get("permissoes")?;
        let permissoes: BTreeSet<String> = serde_json::from_str(&permissoes_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Funcionario {
            username: row.get("username")?,
            password: row.get("password")?,
            nome: row.get("nome")?,
            permissoes,
        })
    }
}

impl Repositorio for SqliteFuncionarioRepository {
    type Chave = String;
    type Registo = Funcionario;

    fn count(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM funcionarios", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn contains(&self, username: &String) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let found: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM funcionarios WHERE username = ?1)",
            params![username],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn get(&self, username: &String) -> AppResult<Option<Funcionario>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT username, password, nome, permissoes FROM funcionarios WHERE username = ?1",
        )?;

        match stmt.query_row(params![username], Self::row_to_funcionario) {
            Ok(funcionario) => Ok(Some(funcionario)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn put(&self, funcionario: &Funcionario) -> AppResult<()> {
        let permissoes_json = serde_json::to_string(&funcionario.permissoes)?;

        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO funcionarios (username, password, nome, permissoes)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                funcionario.username,
                funcionario.password,
                funcionario.nome,
                permissoes_json
            ],
        )?;
        Ok(())
    }

    fn delete(&self, username: &String) -> AppResult<Option<Funcionario>> {
        let existing = self.get(username)?;
        if existing.is_some() {
            let conn = self.pool.get()?;
            conn.execute(
                "DELETE FROM funcionarios WHERE username = ?1",
                params![username],
            )?;
        }
        Ok(existing)
    }

    fn list(&self) -> AppResult<Vec<Funcionario>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT username, password, nome, permissoes FROM funcionarios ORDER BY username",
        )?;

        let funcionarios: Vec<Funcionario> = stmt
            .query_map([], Self::row_to_funcionario)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(funcionarios)
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT username FROM funcionarios ORDER BY username")?;

        let usernames: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(usernames)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM funcionarios", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_permissions_roundtrip_as_json() {
        let repo = SqliteFuncionarioRepository::new(Arc::new(create_test_pool().unwrap()));

        let mut f = Funcionario::new(
            "jcaldas".to_string(),
            "segredo".to_string(),
            "Jorge Caldas".to_string(),
        );
        f.permissoes.insert("gerir_doacoes".to_string());
        f.permissoes.insert("gerir_projetos".to_string());

        repo.put(&f).unwrap();
        assert_eq!(repo.get(&"jcaldas".to_string()).unwrap(), Some(f));
    }
}
