use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::util::{RetryPolicy, with_retry};
use crate::core::cache::Cache;
use crate::core::quote::{FundMatch, QuoteProvider, SearchProvider};

const USER_AGENT: &str = "mfsheet/1.0";

/// Summary modules carrying the fields a fund record is built from.
const QUOTE_MODULES: &str =
    "quoteType,price,fundPerformance,defaultKeyStatistics,topHoldings,fundProfile";

// YahooFinanceProvider implementation for QuoteProvider and SearchProvider
pub struct YahooFinanceProvider {
    base_url: String,
    cache: Arc<Cache<String, serde_json::Value>>,
    retry: RetryPolicy,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, serde_json::Value>>) -> Self {
        YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Quote summary URL for `symbol`; the symbol is a single encoded path segment.
    fn quote_url(&self, symbol: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid provider base URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(["v10", "finance", "quoteSummary"])
            .push(symbol);
        url.query_pairs_mut().append_pair("modules", QUOTE_MODULES);
        Ok(url)
    }

    async fn search_mutual_funds(&self, text: &str) -> Result<Vec<FundMatch>> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1/finance/search", self.base_url),
            &[("q", text)],
        )?;
        debug!("Requesting search results from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = with_retry(|| client.get(url.clone()).send(), self.retry).await?;
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for search: {}", response.status(), text));
        }

        let data = response.json::<YahooSearchResponse>().await?;
        Ok(data
            .quotes
            .into_iter()
            .filter(|quote| quote.quote_type.as_deref() == Some("MUTUALFUND"))
            .map(|fund| FundMatch {
                name: fund.long_name.unwrap_or_default(),
                symbol: fund.symbol,
            })
            .collect())
    }
}

#[derive(Deserialize, Debug)]
struct YahooQuoteSummaryResponse {
    #[serde(alias = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<serde_json::Value>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

impl YahooError {
    fn message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "Unknown provider error".to_string())
    }
}

#[derive(Deserialize, Debug)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Deserialize, Debug)]
struct SearchQuote {
    symbol: String,
    #[serde(alias = "longname")]
    long_name: Option<String>,
    #[serde(alias = "quoteType")]
    quote_type: Option<String>,
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooQuoteFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_raw(&self, symbol: &str) -> Result<serde_json::Value> {
        if let Some(cached) = self.cache.get(&symbol.to_string()).await {
            return Ok(cached);
        }

        let url = self.quote_url(symbol)?;
        debug!("Requesting quote summary from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = with_retry(|| client.get(url.clone()).send(), self.retry)
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        let status = response.status();
        let text = response.text().await?;
        let parsed = serde_json::from_str::<YahooQuoteSummaryResponse>(&text);

        if !status.is_success() {
            return Err(match parsed.ok().and_then(|p| p.quote_summary.error) {
                Some(error) => anyhow!("{} (HTTP {})", error.message(), status),
                None => anyhow!("HTTP error: {} for symbol: {}", status, symbol),
            });
        }

        let data =
            parsed.map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;
        if let Some(error) = data.quote_summary.error {
            return Err(anyhow!("{}", error.message()));
        }

        let summary = data
            .quote_summary
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| anyhow!("No quote data found for symbol: {}", symbol))?;

        self.cache.put(symbol.to_string(), summary.clone()).await;
        Ok(summary)
    }
}

#[async_trait]
impl SearchProvider for YahooFinanceProvider {
    #[instrument(name = "YahooSearch", skip(self))]
    async fn search(&self, text: &str) -> Result<Vec<FundMatch>> {
        self.search_mutual_funds(text).await.map_err(|e| {
            debug!(error = %e, "Search request failed");
            anyhow!("Fund with {text} not found.")
        })
    }
}
