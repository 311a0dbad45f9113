// src/lib.rs
// Habitat - management system for a housing charity
//
// Layers, innermost first:
// - domain: plain entity types, grouped by business area
// - db: SQLite pool and schema lifecycle
// - repositories: one typed store per entity over the shared pool
// - session: the authenticated facade the presentation layer talks to

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod session;

pub use error::{AppError, AppResult};

pub use domain::{
    Candidatura, Doador, Donativo, Equipa, EstadoCandidatura, Evento, Funcionario, Material,
    Membro, Projeto, Representante, Tarefa, TipoDonativo, Voluntario,
};

pub use session::{
    ComparacaoSimples, FichaVoluntario, FichasEmMemoria, FonteFichas, Habitat, LogIn,
    PoliticaPassword, Sessao,
};
