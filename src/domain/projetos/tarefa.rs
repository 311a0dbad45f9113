use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of work within a construction project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tarefa {
    pub id: i64,

    /// Project this task belongs to, if already assigned
    pub projeto: Option<i64>,

    pub designacao: String,

    pub descricao: String,

    pub data_inicio: Option<NaiveDate>,

    /// Set when the task is finished; there is no separate state field
    pub data_fim: Option<NaiveDate>,

    /// Material id -> quantity spent on this task.
    /// Persisted alongside the task record.
    pub material_gasto: BTreeMap<i64, i64>,
}

impl Tarefa {
    pub fn new(id: i64, designacao: String, descricao: String) -> Self {
        Self {
            id,
            projeto: None,
            designacao,
            descricao,
            data_inicio: None,
            data_fim: None,
            material_gasto: BTreeMap::new(),
        }
    }

    /// A task is finished iff its end date is present
    pub fn terminada(&self) -> bool {
        self.data_fim.is_some()
    }
}
