//! Batch export of fund identifiers into an ordered cell matrix.

use super::cell::{Cell, coerce};
use super::normalize::normalize;
use super::quote::{QuoteProvider, QuoteSummary};
use super::record::NormalizedRecord;
use super::schema::FieldSchema;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Requests that cannot produce a single row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No fund identifiers supplied")]
    NoIdentifiers,
    #[error("Fund identifier at position {position} is blank")]
    BlankIdentifier { position: usize },
}

/// Result of fetching one identifier.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(QuoteSummary),
    Failed(String),
}

impl FetchOutcome {
    pub fn summary(&self) -> Option<&QuoteSummary> {
        match self {
            FetchOutcome::Fetched(summary) => Some(summary),
            FetchOutcome::Failed(_) => None,
        }
    }
}

/// Header row followed by one row per fund. Every row has the header's length.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMatrix {
    rows: Vec<Vec<Cell>>,
}

impl ExportMatrix {
    pub fn new() -> Self {
        let header = FieldSchema::ordered_names()
            .into_iter()
            .map(|name| Cell::Text(name.to_string()))
            .collect();
        Self { rows: vec![header] }
    }

    fn push_record(&mut self, record: &NormalizedRecord) {
        let row = coerce(record);
        debug_assert_eq!(row.len(), self.width());
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn header(&self) -> &[Cell] {
        &self.rows[0]
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        &self.rows[1..]
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() == 1
    }
}

impl Default for ExportMatrix {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_identifiers(identifiers: &[String]) -> Result<(), ExportError> {
    if identifiers.is_empty() {
        return Err(ExportError::NoIdentifiers);
    }
    if let Some(position) = identifiers.iter().position(|id| id.trim().is_empty()) {
        return Err(ExportError::BlankIdentifier { position });
    }
    Ok(())
}

pub struct BatchExporter<'a> {
    provider: &'a (dyn QuoteProvider + Send + Sync),
    concurrency: usize,
    fetch_timeout: Duration,
}

impl<'a> BatchExporter<'a> {
    pub fn new(provider: &'a (dyn QuoteProvider + Send + Sync)) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[instrument(name = "FundFetch", skip(self), fields(symbol = %identifier))]
    async fn fetch(&self, identifier: &str) -> FetchOutcome {
        match tokio::time::timeout(self.fetch_timeout, self.provider.fetch_quote(identifier)).await
        {
            Ok(Ok(summary)) => {
                debug!("Fetched quote summary");
                FetchOutcome::Fetched(summary)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Quote fetch failed, exporting an empty row");
                FetchOutcome::Failed(format!("{e:#}"))
            }
            Err(_) => {
                warn!(timeout = ?self.fetch_timeout, "Quote fetch timed out, exporting an empty row");
                FetchOutcome::Failed(format!("Timed out after {:?}", self.fetch_timeout))
            }
        }
    }

    /// Normalized record for one identifier; any failure yields a missing record.
    pub async fn quote(&self, identifier: &str) -> NormalizedRecord {
        let outcome = self.fetch(identifier).await;
        normalize(identifier, outcome.summary())
    }

    pub async fn export_batch(&self, identifiers: &[String]) -> Result<ExportMatrix, ExportError> {
        self.export_batch_with_progress(identifiers, &|| ()).await
    }

    /// Like [`Self::export_batch`], calling `on_progress` once per finished identifier.
    pub async fn export_batch_with_progress(
        &self,
        identifiers: &[String],
        on_progress: &(dyn Fn() + Send + Sync),
    ) -> Result<ExportMatrix, ExportError> {
        validate_identifiers(identifiers)?;
        info!(count = identifiers.len(), "Exporting funds");

        // `buffered` yields in request order whatever the completion order.
        let records: Vec<NormalizedRecord> = stream::iter(identifiers)
            .map(|identifier| async move {
                let record = self.quote(identifier).await;
                on_progress();
                record
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut matrix = ExportMatrix::new();
        for record in &records {
            matrix.push_record(record);
        }

        let empty = records.iter().filter(|r| r.is_empty()).count();
        info!(rows = records.len(), empty, "Export matrix assembled");
        Ok(matrix)
    }
}
