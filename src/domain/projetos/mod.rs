// src/domain/projetos/mod.rs
//
// Projects area: construction projects, tasks, materials

pub mod material;
pub mod projeto;
pub mod tarefa;

pub use material::Material;
pub use projeto::Projeto;
pub use tarefa::Tarefa;
