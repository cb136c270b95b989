use super::ui;
use crate::core::{BatchExporter, FieldSchema, NormalizedRecord, QuoteProvider, coerce};
use anyhow::Result;
use comfy_table::Cell;
use std::time::Duration;
use tracing::info;

/// How a single fund lookup is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutput {
    Table,
    Json,
    /// Provider response as received, no normalization.
    Raw,
}

pub async fn run(
    provider: &(dyn QuoteProvider + Send + Sync),
    symbol: &str,
    output: QuoteOutput,
    fetch_timeout: Duration,
) -> Result<()> {
    info!(symbol, "Looking up fund");

    if output == QuoteOutput::Raw {
        let raw = provider.fetch_raw(symbol).await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let record = BatchExporter::new(provider)
        .with_fetch_timeout(fetch_timeout)
        .quote(symbol)
        .await;

    match output {
        QuoteOutput::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        _ => display_record(symbol, &record),
    }
    Ok(())
}

fn display_record(symbol: &str, record: &NormalizedRecord) {
    let title = record.name.as_deref().unwrap_or(symbol);
    println!("\nFund: {}", ui::style_text(title, ui::StyleType::Title));

    if record.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No data available for {symbol}"),
                ui::StyleType::Error
            )
        );
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);
    for (name, cell) in FieldSchema::ordered_names().into_iter().zip(coerce(record)) {
        table.add_row(vec![Cell::new(name), ui::value_cell(&cell)]);
    }
    println!("{table}");
}
