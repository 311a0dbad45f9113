use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A donation, identified by receipt number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donativo {
    pub nr_recibo: i64,

    /// NIF of the donor who made this donation
    pub doador: String,

    pub data: NaiveDate,

    pub tipo: TipoDonativo,
}

/// Monetary vs in-kind donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoDonativo {
    Monetario { valor: f64 },
    EmEspecie { descricao: String },
}

impl Donativo {
    pub fn new(nr_recibo: i64, doador: String, data: NaiveDate, tipo: TipoDonativo) -> Self {
        Self {
            nr_recibo,
            doador,
            data,
            tipo,
        }
    }

    /// Monetary value, `None` for in-kind donations
    pub fn valor_monetario(&self) -> Option<f64> {
        match &self.tipo {
            TipoDonativo::Monetario { valor } => Some(*valor),
            TipoDonativo::EmEspecie { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valor_monetario_discriminates_subtype() {
        let d = Donativo::new(
            1,
            "123456789".to_string(),
            NaiveDate::from_ymd_opt(2014, 12, 30).unwrap(),
            TipoDonativo::Monetario { valor: 50.0 },
        );
        assert_eq!(d.valor_monetario(), Some(50.0));

        let e = Donativo::new(
            2,
            "123456789".to_string(),
            NaiveDate::from_ymd_opt(2014, 12, 30).unwrap(),
            TipoDonativo::EmEspecie {
                descricao: "ferramentas".to_string(),
            },
        );
        assert_eq!(e.valor_monetario(), None);
    }
}
