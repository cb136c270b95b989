//! Normalized fund record types.

use super::schema::Field;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A top holding. The provider sometimes lists one (often cash) without a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Riskometer {
    High,
    Medium,
    Low,
}

impl Display for Riskometer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Riskometer::High => "high",
                Riskometer::Medium => "medium",
                Riskometer::Low => "low",
            }
        )
    }
}

/// Alpha, beta, standard deviation, r-squared and sharpe ratio over one horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskWindow {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub r_squared: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

/// Borrowed view of one field's value. `Missing` is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
    Riskometer(Riskometer),
    Holdings(&'a [Holding]),
}

/// One fund's metrics. Every field of the schema is present, `None` meaning missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub return_1y: Option<f64>,
    pub return_3y: Option<f64>,
    pub return_5y: Option<f64>,
    pub return_10y: Option<f64>,
    pub risk_3y: RiskWindow,
    pub risk_5y: RiskWindow,
    pub risk_10y: RiskWindow,
    pub expense_ratio: Option<f64>,
    pub riskometer: Option<Riskometer>,
    pub morningstar_risk_rating: Option<f64>,
    pub morningstar_overall_rating: Option<f64>,
    pub no_of_stocks: Option<u64>,
    pub market_cap: Option<f64>,
    pub holdings: Option<Vec<Holding>>,
    pub turnover: Option<f64>,
}

impl NormalizedRecord {
    /// Record with only the identifier set.
    pub fn missing(identifier: &str) -> Self {
        Self {
            id: Some(identifier.to_string()),
            ..Default::default()
        }
    }

    pub fn value(&self, field: Field) -> FieldValue<'_> {
        use FieldValue::Missing;

        let num = |v: Option<f64>| v.map_or(Missing, FieldValue::Number);
        match field {
            Field::Id => self.id.as_deref().map_or(Missing, FieldValue::Text),
            Field::Name => self.name.as_deref().map_or(Missing, FieldValue::Text),
            Field::Return1y => num(self.return_1y),
            Field::Return3y => num(self.return_3y),
            Field::Return5y => num(self.return_5y),
            Field::Return10y => num(self.return_10y),
            Field::Alpha3y => num(self.risk_3y.alpha),
            Field::Alpha5y => num(self.risk_5y.alpha),
            Field::Alpha10y => num(self.risk_10y.alpha),
            Field::Beta3y => num(self.risk_3y.beta),
            Field::Beta5y => num(self.risk_5y.beta),
            Field::Beta10y => num(self.risk_10y.beta),
            Field::StandardDeviation3y => num(self.risk_3y.standard_deviation),
            Field::StandardDeviation5y => num(self.risk_5y.standard_deviation),
            Field::StandardDeviation10y => num(self.risk_10y.standard_deviation),
            Field::RSquared3y => num(self.risk_3y.r_squared),
            Field::RSquared5y => num(self.risk_5y.r_squared),
            Field::RSquared10y => num(self.risk_10y.r_squared),
            Field::SharpeRatio3y => num(self.risk_3y.sharpe_ratio),
            Field::SharpeRatio5y => num(self.risk_5y.sharpe_ratio),
            Field::SharpeRatio10y => num(self.risk_10y.sharpe_ratio),
            Field::ExpenseRatio => num(self.expense_ratio),
            Field::Riskometer => self.riskometer.map_or(Missing, FieldValue::Riskometer),
            Field::MorningstarRiskRating => num(self.morningstar_risk_rating),
            Field::MorningstarOverallRating => num(self.morningstar_overall_rating),
            Field::NoOfStocks => num(self.no_of_stocks.map(|n| n as f64)),
            Field::MarketCap => num(self.market_cap),
            Field::Holdings => self
                .holdings
                .as_deref()
                .map_or(Missing, FieldValue::Holdings),
            Field::Turnover => num(self.turnover),
        }
    }

    /// True when nothing beyond the identifier is known.
    pub fn is_empty(&self) -> bool {
        let without_id = Self {
            id: None,
            ..self.clone()
        };
        without_id == Self::default()
    }
}
