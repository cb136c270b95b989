//! Converts provider quote summaries into [`NormalizedRecord`]s.
//!
//! Absent sections only blank out the fields that live under them; nothing in
//! here fails.

use super::quote::{QuoteSummary, RiskStatistic, TopHolding, number};
use super::record::{Holding, NormalizedRecord, RiskWindow};

/// Statistical horizons reported in the provider's risk statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskHorizon {
    ThreeYears,
    FiveYears,
    TenYears,
}

impl RiskHorizon {
    pub fn years(&self) -> u32 {
        match self {
            RiskHorizon::ThreeYears => 3,
            RiskHorizon::FiveYears => 5,
            RiskHorizon::TenYears => 10,
        }
    }

    /// Whether a provider year tag ("3y", "5Y", "10 years") names this horizon.
    fn matches(&self, tag: &str) -> bool {
        let digits: String = tag
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse::<u32>().is_ok_and(|y| y == self.years())
    }
}

/// First entry tagged with `horizon`, folded into a window. No match gives an all-missing window.
pub fn risk_window(statistics: &[RiskStatistic], horizon: RiskHorizon) -> RiskWindow {
    statistics
        .iter()
        .find(|stat| stat.year.as_deref().is_some_and(|y| horizon.matches(y)))
        .map(|stat| RiskWindow {
            alpha: number(&stat.alpha),
            beta: number(&stat.beta),
            standard_deviation: number(&stat.std_dev),
            r_squared: number(&stat.r_squared),
            sharpe_ratio: number(&stat.sharpe_ratio),
        })
        .unwrap_or_default()
}

/// Entries with neither a name, a symbol nor a weight carry nothing and are skipped.
fn holding(entry: &TopHolding) -> Option<Holding> {
    let percentage = number(&entry.holding_percent);
    let name = entry.holding_name.clone().or_else(|| entry.symbol.clone());
    if name.is_none() && percentage.is_none() {
        return None;
    }
    Some(Holding {
        name: name.unwrap_or_default(),
        percentage,
    })
}

pub fn normalize(identifier: &str, raw: Option<&QuoteSummary>) -> NormalizedRecord {
    let Some(summary) = raw else {
        return NormalizedRecord::missing(identifier);
    };

    let performance = summary.fund_performance.as_ref();
    let trailing = performance.and_then(|p| p.trailing_returns.as_ref());
    let statistics = performance
        .and_then(|p| p.risk_overview_statistics.as_ref())
        .and_then(|r| r.risk_statistics.as_deref())
        .unwrap_or_default();
    let key_stats = summary.default_key_statistics.as_ref();
    let top = summary.top_holdings.as_ref();

    NormalizedRecord {
        id: Some(identifier.to_string()),
        name: summary.quote_type.as_ref().and_then(|q| q.long_name.clone()),
        return_1y: trailing.and_then(|t| number(&t.one_year)),
        return_3y: trailing.and_then(|t| number(&t.three_year)),
        return_5y: trailing.and_then(|t| number(&t.five_year)),
        return_10y: trailing.and_then(|t| number(&t.ten_year)),
        risk_3y: risk_window(statistics, RiskHorizon::ThreeYears),
        risk_5y: risk_window(statistics, RiskHorizon::FiveYears),
        risk_10y: risk_window(statistics, RiskHorizon::TenYears),
        expense_ratio: summary
            .fund_profile
            .as_ref()
            .and_then(|p| p.fees_expenses_investment.as_ref())
            .and_then(|f| number(&f.net_exp_ratio)),
        riskometer: None,
        morningstar_risk_rating: key_stats.and_then(|k| number(&k.morning_star_risk_rating)),
        morningstar_overall_rating: key_stats
            .and_then(|k| number(&k.morning_star_overall_rating)),
        no_of_stocks: top
            .and_then(|t| t.equity_holdings.as_ref())
            .and_then(|e| e.as_array())
            .map(|list| list.len() as u64),
        market_cap: summary
            .price
            .as_ref()
            .and_then(|p| number(&p.market_cap)),
        holdings: top
            .and_then(|t| t.holdings.as_ref())
            .map(|list| list.iter().filter_map(holding).collect()),
        turnover: None,
    }
}
