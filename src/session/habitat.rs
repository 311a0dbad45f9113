// src/session/habitat.rs
//
// Unauthenticated gateway: holds the repository set, offers log-in only.

use std::sync::Arc;

use super::{Repos, Sessao};
use crate::db::{self, ConnectionPool};
use crate::error::AppResult;
use crate::repositories::Repositorio;

/// Tri-state authentication outcome.
///
/// The three cases drive different messages in the presentation layer, so
/// they are never collapsed into a plain success/failure pair.
pub enum LogIn {
    UtilizadorDesconhecido,
    PasswordIncorreta,
    Autenticado(Sessao),
}

/// Password comparison policy.
///
/// The stored credential format is owned by whoever provisions staff
/// accounts; this seam lets a deployment swap plain comparison for a
/// hash check without touching the session layer.
pub trait PoliticaPassword: Send + Sync {
    fn verifica(&self, fornecida: &str, guardada: &str) -> bool;
}

/// Plain equality, the historical behavior.
pub struct ComparacaoSimples;

impl PoliticaPassword for ComparacaoSimples {
    fn verifica(&self, fornecida: &str, guardada: &str) -> bool {
        fornecida == guardada
    }
}

/// Entry gateway to the system. Only `log_in` is reachable from here;
/// every domain operation lives on the [`Sessao`] it produces.
pub struct Habitat {
    repos: Arc<Repos>,
    politica: Arc<dyn PoliticaPassword>,
}

impl Habitat {
    /// Open the gateway over a ready pool.
    ///
    /// Applies the schema initializer up front, so an unreachable or
    /// incompatible database fails here rather than on the first operation.
    pub fn open(pool: ConnectionPool) -> AppResult<Self> {
        Self::open_com_politica(pool, Arc::new(ComparacaoSimples))
    }

    pub fn open_com_politica(
        pool: ConnectionPool,
        politica: Arc<dyn PoliticaPassword>,
    ) -> AppResult<Self> {
        let conn = db::get_connection(&pool)?;
        db::initialize_database(&conn)?;
        drop(conn);

        Ok(Self {
            repos: Arc::new(Repos::new(Arc::new(pool))),
            politica,
        })
    }

    /// Authenticate a staff member.
    ///
    /// Returns the tri-state outcome; on success the produced session
    /// carries the authenticated record. I/O failures propagate as errors,
    /// never as a failed log-in.
    pub fn log_in(&self, username: &str, password: &str) -> AppResult<LogIn> {
        let funcionario = match self.repos.funcionarios.get(&username.to_string())? {
            Some(f) => f,
            None => {
                log::debug!("log-in rejected: unknown user {:?}", username);
                return Ok(LogIn::UtilizadorDesconhecido);
            }
        };

        if !self.politica.verifica(password, &funcionario.password) {
            log::debug!("log-in rejected: bad password for {:?}", username);
            return Ok(LogIn::PasswordIncorreta);
        }

        log::info!("session opened for {:?}", username);
        Ok(LogIn::Autenticado(Sessao::new(
            Arc::clone(&self.repos),
            funcionario,
        )))
    }
}
