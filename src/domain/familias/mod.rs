// src/domain/familias/mod.rs
//
// Families area: housing applications, family members, representatives

pub mod candidatura;
pub mod membro;
pub mod representante;

pub use candidatura::{Candidatura, EstadoCandidatura};
pub use membro::Membro;
pub use representante::Representante;
