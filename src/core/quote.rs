//! Quote provider abstractions and the provider response model

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// A number as reported by the provider.
///
/// The same metric shows up bare (`0.12`), formatted (`{"raw": 0.12, "fmt": "12%"}`),
/// as an empty object when the provider has nothing, or as a placeholder string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderNumber {
    Plain(f64),
    Formatted { raw: Option<f64> },
    Other(serde_json::Value),
}

impl ProviderNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            ProviderNumber::Plain(v) => Some(*v),
            ProviderNumber::Formatted { raw } => *raw,
            ProviderNumber::Other(_) => None,
        }
    }
}

/// Reads an optional provider number, treating every non-numeric shape as missing.
pub fn number(value: &Option<ProviderNumber>) -> Option<f64> {
    value.as_ref().and_then(ProviderNumber::value)
}

/// A value of the wrong JSON shape reads as absent, so only the fields under it go missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(
                expected = std::any::type_name::<T>(),
                error = %e,
                "Ignoring malformed quote section"
            );
            Ok(None)
        }
    }
}

/// Like [`lenient`], but a list keeps its well-formed entries.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(items) = lenient::<D, Vec<serde_json::Value>>(deserializer)? else {
        return Ok(None);
    };
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if parsed.len() < total {
        warn!(
            dropped = total - parsed.len(),
            "Ignoring malformed quote list entries"
        );
    }
    Ok(Some(parsed))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSummary {
    #[serde(deserialize_with = "lenient")]
    pub quote_type: Option<QuoteTypeSection>,
    #[serde(deserialize_with = "lenient")]
    pub price: Option<PriceSection>,
    #[serde(deserialize_with = "lenient")]
    pub fund_performance: Option<FundPerformance>,
    #[serde(deserialize_with = "lenient")]
    pub default_key_statistics: Option<DefaultKeyStatistics>,
    #[serde(deserialize_with = "lenient")]
    pub top_holdings: Option<TopHoldings>,
    #[serde(deserialize_with = "lenient")]
    pub fund_profile: Option<FundProfile>,
}

impl QuoteSummary {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("Unexpected quote summary layout")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteTypeSection {
    #[serde(deserialize_with = "lenient")]
    pub long_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub quote_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceSection {
    pub market_cap: Option<ProviderNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundPerformance {
    #[serde(deserialize_with = "lenient")]
    pub trailing_returns: Option<TrailingReturns>,
    #[serde(deserialize_with = "lenient")]
    pub risk_overview_statistics: Option<RiskOverviewStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrailingReturns {
    pub one_year: Option<ProviderNumber>,
    pub three_year: Option<ProviderNumber>,
    pub five_year: Option<ProviderNumber>,
    pub ten_year: Option<ProviderNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskOverviewStatistics {
    #[serde(deserialize_with = "lenient_list")]
    pub risk_statistics: Option<Vec<RiskStatistic>>,
}

/// One entry of the unordered risk statistics list, tagged by `year` ("3y", "5y", ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskStatistic {
    #[serde(deserialize_with = "lenient")]
    pub year: Option<String>,
    pub alpha: Option<ProviderNumber>,
    pub beta: Option<ProviderNumber>,
    pub std_dev: Option<ProviderNumber>,
    pub r_squared: Option<ProviderNumber>,
    pub sharpe_ratio: Option<ProviderNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultKeyStatistics {
    pub morning_star_overall_rating: Option<ProviderNumber>,
    pub morning_star_risk_rating: Option<ProviderNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopHoldings {
    #[serde(deserialize_with = "lenient_list")]
    pub holdings: Option<Vec<TopHolding>>,
    /// Only counted when the provider sends a list.
    pub equity_holdings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopHolding {
    #[serde(deserialize_with = "lenient")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub holding_name: Option<String>,
    pub holding_percent: Option<ProviderNumber>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundProfile {
    #[serde(deserialize_with = "lenient")]
    pub fees_expenses_investment: Option<FeesExpenses>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeesExpenses {
    pub net_exp_ratio: Option<ProviderNumber>,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider-shaped summary for `symbol`, as received.
    async fn fetch_raw(&self, symbol: &str) -> Result<serde_json::Value>;

    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSummary> {
        let raw = self.fetch_raw(symbol).await?;
        QuoteSummary::from_value(raw).with_context(|| format!("Malformed quote for {symbol}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundMatch {
    pub name: String,
    pub symbol: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, text: &str) -> Result<Vec<FundMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_number_shapes() {
        let parse = |v: serde_json::Value| -> Option<f64> {
            serde_json::from_value::<ProviderNumber>(v).unwrap().value()
        };
        assert_eq!(parse(json!(0.12)), Some(0.12));
        assert_eq!(parse(json!(7)), Some(7.0));
        assert_eq!(parse(json!({"raw": 1.5, "fmt": "1.50"})), Some(1.5));
        assert_eq!(parse(json!({})), None);
        assert_eq!(parse(json!("N/A")), None);
    }

    #[test]
    fn test_summary_tolerates_missing_sections() {
        let summary = QuoteSummary::from_value(json!({
            "quoteType": {"longName": "Vanguard 500 Index Fund"},
            "somethingElse": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(
            summary.quote_type.and_then(|q| q.long_name).as_deref(),
            Some("Vanguard 500 Index Fund")
        );
        assert!(summary.fund_performance.is_none());
        assert!(summary.top_holdings.is_none());
    }

    #[test]
    fn test_wrong_section_shape_only_drops_that_section() {
        let summary = QuoteSummary::from_value(json!({
            "quoteType": {"longName": "Good Fund"},
            "fundPerformance": {
                "trailingReturns": {"threeYear": {"raw": 12.5}},
                "riskOverviewStatistics": {"riskStatistics": "none"}
            },
            "topHoldings": {"holdings": {"unexpected": "object"}},
            "fundProfile": "n/a"
        }))
        .unwrap();

        assert_eq!(
            summary.quote_type.and_then(|q| q.long_name).as_deref(),
            Some("Good Fund")
        );
        let performance = summary.fund_performance.unwrap();
        assert_eq!(
            number(&performance.trailing_returns.unwrap().three_year),
            Some(12.5)
        );
        assert!(performance.risk_overview_statistics.unwrap().risk_statistics.is_none());
        assert!(summary.top_holdings.unwrap().holdings.is_none());
        assert!(summary.fund_profile.is_none());
    }

    #[test]
    fn test_malformed_list_entries_are_skipped() {
        let top: TopHoldings = serde_json::from_value(json!({
            "holdings": [
                "junk",
                {"symbol": "AAPL", "holdingName": 42, "holdingPercent": {"raw": 0.07}}
            ]
        }))
        .unwrap();
        let holdings = top.holdings.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol.as_deref(), Some("AAPL"));
        assert_eq!(holdings[0].holding_name, None);
    }

    #[test]
    fn test_summary_rejects_non_object() {
        assert!(QuoteSummary::from_value(json!("n/a")).is_err());
    }

    #[test]
    fn test_risk_statistic_field_names() {
        let stat: RiskStatistic = serde_json::from_value(json!({
            "year": "5y",
            "alpha": {"raw": 0.3},
            "beta": 1.01,
            "stdDev": 15.2,
            "rSquared": 99.9,
            "sharpeRatio": {"raw": 0.91, "fmt": "0.91"}
        }))
        .unwrap();
        assert_eq!(stat.year.as_deref(), Some("5y"));
        assert_eq!(number(&stat.alpha), Some(0.3));
        assert_eq!(number(&stat.std_dev), Some(15.2));
        assert_eq!(number(&stat.r_squared), Some(99.9));
        assert_eq!(number(&stat.sharpe_ratio), Some(0.91));
    }
}
