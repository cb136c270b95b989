pub mod cli;
pub mod core;
pub mod providers;
pub mod writers;

use crate::cli::quote::QuoteOutput;
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::export::validate_identifiers;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Quote summaries are reused for this long within one run.
const QUOTE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub enum AppCommand {
    Quote {
        symbol: String,
        output: QuoteOutput,
    },
    Search {
        text: String,
    },
    Export {
        symbols: Vec<String>,
        file: Option<PathBuf>,
        output: Option<PathBuf>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Fund sheet starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let quote_cache = Arc::new(Cache::<String, serde_json::Value>::with_ttl(QUOTE_CACHE_TTL));
    let provider = providers::yahoo_finance::YahooFinanceProvider::new(
        config.providers.yahoo_base_url(),
        quote_cache,
    );

    match command {
        AppCommand::Quote { symbol, output } => {
            cli::quote::run(&provider, &symbol, output, config.export.fetch_timeout()).await
        }
        AppCommand::Search { text } => cli::search::run(&provider, &text).await,
        AppCommand::Export {
            symbols,
            file,
            output,
        } => {
            let identifiers =
                cli::export::resolve_identifiers(symbols, file.as_deref(), &config.funds)?;
            validate_identifiers(&identifiers)?;

            let writer = writers::XlsxWriter::new(&config.export.sheet_name);
            cli::export::run(&provider, &writer, &identifiers, output, &config.export).await?;
            Ok(())
        }
    }
}
