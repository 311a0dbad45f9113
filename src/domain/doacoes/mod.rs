// src/domain/doacoes/mod.rs
//
// Donations area: donors, donations, fundraising events

pub mod doador;
pub mod donativo;
pub mod evento;

pub use doador::Doador;
pub use donativo::{Donativo, TipoDonativo};
pub use evento::Evento;
