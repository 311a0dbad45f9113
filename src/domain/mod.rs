// src/domain/mod.rs
//
// Domain root: entities for the four business areas.
// All other modules import from `crate::domain::*`.

pub mod doacoes;
pub mod familias;
pub mod projetos;
pub mod recursos_humanos;

pub use doacoes::{Doador, Donativo, Evento, TipoDonativo};
pub use familias::{Candidatura, EstadoCandidatura, Membro, Representante};
pub use projetos::{Material, Projeto, Tarefa};
pub use recursos_humanos::{Equipa, Funcionario, Voluntario};
