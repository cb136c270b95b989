//! Canonical column layout for normalized fund records.
//!
//! The order of [`FIELDS`] decides both the header row and the cell order of
//! every exported row. It is declared here once and never derived from a
//! populated record.

use serde::Serialize;
use std::fmt::Display;

/// Kind of value a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Number,
    Text,
    /// One of a fixed set of labels, see [`crate::core::record::Riskometer`].
    Enumerated,
    /// List of `{name, percentage}` pairs.
    Holdings,
    /// Declared column the provider never fills.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Id,
    Name,
    Return1y,
    Return3y,
    Return5y,
    Return10y,
    Alpha3y,
    Alpha5y,
    Alpha10y,
    Beta3y,
    Beta5y,
    Beta10y,
    StandardDeviation3y,
    StandardDeviation5y,
    StandardDeviation10y,
    RSquared3y,
    RSquared5y,
    RSquared10y,
    SharpeRatio3y,
    SharpeRatio5y,
    SharpeRatio10y,
    ExpenseRatio,
    Riskometer,
    MorningstarRiskRating,
    MorningstarOverallRating,
    NoOfStocks,
    MarketCap,
    Holdings,
    Turnover,
}

/// Column order of every export.
pub const FIELDS: [Field; 29] = [
    Field::Id,
    Field::Name,
    Field::Return1y,
    Field::Return3y,
    Field::Return5y,
    Field::Return10y,
    Field::Alpha3y,
    Field::Alpha5y,
    Field::Alpha10y,
    Field::Beta3y,
    Field::Beta5y,
    Field::Beta10y,
    Field::StandardDeviation3y,
    Field::StandardDeviation5y,
    Field::StandardDeviation10y,
    Field::RSquared3y,
    Field::RSquared5y,
    Field::RSquared10y,
    Field::SharpeRatio3y,
    Field::SharpeRatio5y,
    Field::SharpeRatio10y,
    Field::ExpenseRatio,
    Field::Riskometer,
    Field::MorningstarRiskRating,
    Field::MorningstarOverallRating,
    Field::NoOfStocks,
    Field::MarketCap,
    Field::Holdings,
    Field::Turnover,
];

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Return1y => "return_1y",
            Field::Return3y => "return_3y",
            Field::Return5y => "return_5y",
            Field::Return10y => "return_10y",
            Field::Alpha3y => "alpha_3y",
            Field::Alpha5y => "alpha_5y",
            Field::Alpha10y => "alpha_10y",
            Field::Beta3y => "beta_3y",
            Field::Beta5y => "beta_5y",
            Field::Beta10y => "beta_10y",
            Field::StandardDeviation3y => "standard_deviation_3y",
            Field::StandardDeviation5y => "standard_deviation_5y",
            Field::StandardDeviation10y => "standard_deviation_10y",
            Field::RSquared3y => "r_squared_3y",
            Field::RSquared5y => "r_squared_5y",
            Field::RSquared10y => "r_squared_10y",
            Field::SharpeRatio3y => "sharpe_ratio_3y",
            Field::SharpeRatio5y => "sharpe_ratio_5y",
            Field::SharpeRatio10y => "sharpe_ratio_10y",
            Field::ExpenseRatio => "expense_ratio",
            Field::Riskometer => "riskometer",
            Field::MorningstarRiskRating => "morningstar_risk_rating",
            Field::MorningstarOverallRating => "morningstar_overall_rating",
            Field::NoOfStocks => "no_of_stocks",
            Field::MarketCap => "market_cap",
            Field::Holdings => "holdings",
            Field::Turnover => "turnover",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Id | Field::Name => FieldKind::Text,
            Field::Riskometer => FieldKind::Enumerated,
            Field::Holdings => FieldKind::Holdings,
            Field::Turnover => FieldKind::Placeholder,
            _ => FieldKind::Number,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Accessors over the declared field list.
pub struct FieldSchema;

impl FieldSchema {
    pub fn fields() -> &'static [Field] {
        &FIELDS
    }

    pub fn ordered_names() -> Vec<&'static str> {
        FIELDS.iter().map(Field::name).collect()
    }

    pub fn len() -> usize {
        FIELDS.len()
    }

    pub fn position(field: Field) -> Option<usize> {
        FIELDS.iter().position(|f| *f == field)
    }
}
