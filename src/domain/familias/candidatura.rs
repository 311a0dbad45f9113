use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A family's application for housing assistance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidatura {
    pub nr: i64,

    pub estado: EstadoCandidatura,

    pub descricao: String,

    pub data_submissao: NaiveDate,

    /// Set once the application is decided
    pub data_decisao: Option<NaiveDate>,

    /// Username of the staff member who registered the application
    pub funcionario_registou: Option<String>,

    /// Username of the staff member who approved it
    pub funcionario_aprovou: Option<String>,

    /// Ids of the family members covered by this application.
    /// Hydrated from the members table on read.
    pub membros: Vec<i64>,

    pub representante: i64,
}

/// Review state of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoCandidatura {
    EmAnalise,
    Aprovada,
    Rejeitada,
}

impl EstadoCandidatura {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoCandidatura::EmAnalise => "em_analise",
            EstadoCandidatura::Aprovada => "aprovada",
            EstadoCandidatura::Rejeitada => "rejeitada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "em_analise" => Some(EstadoCandidatura::EmAnalise),
            "aprovada" => Some(EstadoCandidatura::Aprovada),
            "rejeitada" => Some(EstadoCandidatura::Rejeitada),
            _ => None,
        }
    }
}

impl Candidatura {
    /// A freshly submitted application, still under review
    pub fn new(nr: i64, descricao: String, data_submissao: NaiveDate, representante: i64) -> Self {
        Self {
            nr,
            estado: EstadoCandidatura::EmAnalise,
            descricao,
            data_submissao,
            data_decisao: None,
            funcionario_registou: None,
            funcionario_aprovou: None,
            membros: Vec::new(),
            representante,
        }
    }
}
