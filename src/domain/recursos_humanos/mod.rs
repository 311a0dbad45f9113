// src/domain/recursos_humanos/mod.rs
//
// Human-resources area: teams, staff, volunteers

pub mod equipa;
pub mod funcionario;
pub mod voluntario;

pub use equipa::Equipa;
pub use funcionario::Funcionario;
pub use voluntario::Voluntario;
