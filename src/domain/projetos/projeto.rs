use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A construction project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projeto {
    pub nr: i64,

    pub nome: String,

    pub descricao: String,

    pub data_inicio: Option<NaiveDate>,

    /// Ids of the tasks opened under this project.
    /// Hydrated from the tasks table on read.
    pub tarefas: Vec<i64>,

    /// Ids of the materials reserved for this project.
    /// Persisted alongside the project record.
    pub materiais: BTreeSet<i64>,
}

impl Projeto {
    pub fn new(nr: i64, nome: String, descricao: String) -> Self {
        Self {
            nr,
            nome,
            descricao,
            data_inicio: None,
            tarefas: Vec::new(),
            materiais: BTreeSet::new(),
        }
    }
}
