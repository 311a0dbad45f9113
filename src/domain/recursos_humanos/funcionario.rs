use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A staff member, the authentication principal of the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funcionario {
    /// Unique login name, the natural key
    pub username: String,

    /// Stored credential. Comparison policy lives in the session layer.
    pub password: String,

    pub nome: String,

    pub permissoes: BTreeSet<String>,
}

impl Funcionario {
    pub fn new(username: String, password: String, nome: String) -> Self {
        Self {
            username,
            password,
            nome,
            permissoes: BTreeSet::new(),
        }
    }

    /// First and last name, for display next to the session
    pub fn nome_curto(&self) -> String {
        let mut parts = self.nome.split_whitespace();
        match (parts.next(), parts.last()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => String::new(),
        }
    }

    /// True iff this staff member holds every requested permission
    pub fn tem_permissoes(&self, pedidas: &[String]) -> bool {
        pedidas.iter().all(|p| self.permissoes.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nome_curto_takes_first_and_last() {
        let f = Funcionario::new(
            "jcaldas".to_string(),
            "x".to_string(),
            "Jorge Manuel Caldas".to_string(),
        );
        assert_eq!(f.nome_curto(), "Jorge Caldas");
    }

    #[test]
    fn test_nome_curto_single_name() {
        let f = Funcionario::new("a".to_string(), "x".to_string(), "Jorge".to_string());
        assert_eq!(f.nome_curto(), "Jorge");
    }

    #[test]
    fn test_tem_permissoes_is_subset_check() {
        let mut f = Funcionario::new("a".to_string(), "x".to_string(), "A".to_string());
        f.permissoes.insert("gerir_projetos".to_string());
        f.permissoes.insert("gerir_doacoes".to_string());

        assert!(f.tem_permissoes(&["gerir_projetos".to_string()]));
        assert!(!f.tem_permissoes(&[
            "gerir_projetos".to_string(),
            "gerir_familias".to_string()
        ]));
        // Empty request is trivially satisfied
        assert!(f.tem_permissoes(&[]));
    }
}
