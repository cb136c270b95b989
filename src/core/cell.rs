//! Spreadsheet-safe cell values.

use super::record::{FieldValue, NormalizedRecord};
use super::schema::{Field, FieldSchema};
use std::fmt::Display;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Empty => Ok(()),
        }
    }
}

fn coerce_value(field: Field, value: FieldValue<'_>) -> Cell {
    match value {
        FieldValue::Missing => Cell::Empty,
        FieldValue::Number(n) if n.is_finite() => Cell::Number(n),
        FieldValue::Number(n) => {
            warn!(field = %field, value = n, "Dropping non-finite number");
            Cell::Empty
        }
        FieldValue::Text(s) => Cell::Text(s.to_string()),
        FieldValue::Riskometer(r) => Cell::Text(r.to_string()),
        // Composite values take exactly one cell, as compact JSON.
        FieldValue::Holdings(holdings) => match serde_json::to_string(holdings) {
            Ok(json) => Cell::Text(json),
            Err(e) => {
                warn!(field = %field, error = %e, "Failed to encode holdings");
                Cell::Empty
            }
        },
    }
}

/// One cell per schema field, in schema order.
pub fn coerce(record: &NormalizedRecord) -> Vec<Cell> {
    FieldSchema::fields()
        .iter()
        .map(|field| coerce_value(*field, record.value(*field)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize;
    use crate::core::quote::QuoteSummary;
    use crate::core::record::{Holding, Riskometer};

    #[test]
    fn test_length_matches_schema() {
        let empty = coerce(&normalize("FUNDX", None));
        let defaulted = coerce(&normalize("FUNDX", Some(&QuoteSummary::default())));
        assert_eq!(empty.len(), FieldSchema::ordered_names().len());
        assert_eq!(defaulted.len(), FieldSchema::ordered_names().len());
    }

    #[test]
    fn test_missing_values_become_empty_cells() {
        let cells = coerce(&NormalizedRecord::missing("FUNDX"));
        assert_eq!(cells[0], Cell::Text("FUNDX".to_string()));
        assert!(cells[1..].iter().all(|c| *c == Cell::Empty));
        assert_eq!(cells[1].to_string(), "");
    }

    #[test]
    fn test_holdings_take_one_cell_and_round_trip() {
        let holdings = vec![Holding {
            name: "Stock A".to_string(),
            percentage: Some(5.2),
        }];
        let record = NormalizedRecord {
            holdings: Some(holdings.clone()),
            ..NormalizedRecord::missing("FUNDX")
        };
        let cells = coerce(&record);
        let index = FieldSchema::position(Field::Holdings).unwrap();

        let Cell::Text(json) = &cells[index] else {
            panic!("Expected a text cell, got {:?}", cells[index]);
        };
        assert_eq!(json, r#"[{"name":"Stock A","percentage":5.2}]"#);
        let decoded: Vec<Holding> = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, holdings);
    }

    #[test]
    fn test_holding_without_weight_omits_percentage() {
        let record = NormalizedRecord {
            holdings: Some(vec![Holding {
                name: "Cash".to_string(),
                percentage: None,
            }]),
            ..NormalizedRecord::missing("FUNDX")
        };
        let cells = coerce(&record);
        let index = FieldSchema::position(Field::Holdings).unwrap();
        assert_eq!(cells[index], Cell::Text(r#"[{"name":"Cash"}]"#.to_string()));
    }

    #[test]
    fn test_scalars_and_non_finite_numbers() {
        let record = NormalizedRecord {
            return_3y: Some(12.5),
            return_5y: Some(0.0),
            market_cap: Some(f64::NAN),
            riskometer: Some(Riskometer::High),
            ..NormalizedRecord::missing("FUNDX")
        };
        let cells = coerce(&record);

        assert_eq!(cells[FieldSchema::position(Field::Return3y).unwrap()], Cell::Number(12.5));
        assert_eq!(cells[FieldSchema::position(Field::Return5y).unwrap()], Cell::Number(0.0));
        assert_eq!(cells[FieldSchema::position(Field::MarketCap).unwrap()], Cell::Empty);
        assert_eq!(
            cells[FieldSchema::position(Field::Riskometer).unwrap()],
            Cell::Text("high".to_string())
        );
    }
}
