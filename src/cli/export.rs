use super::ui;
use crate::core::config::ExportConfig;
use crate::core::{BatchExporter, QuoteProvider};
use crate::writers::SheetWriter;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads one identifier per line, skipping blank lines and `#` comments.
pub fn read_identifier_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read identifier file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Command line symbols win over the identifier file, which wins over the configured watchlist.
pub fn resolve_identifiers(
    symbols: Vec<String>,
    file: Option<&Path>,
    watchlist: &[String],
) -> Result<Vec<String>> {
    if !symbols.is_empty() {
        return Ok(symbols);
    }
    if let Some(path) = file {
        return read_identifier_file(path);
    }
    Ok(watchlist.to_vec())
}

pub async fn run(
    provider: &(dyn QuoteProvider + Send + Sync),
    writer: &dyn SheetWriter,
    identifiers: &[String],
    output: Option<PathBuf>,
    config: &ExportConfig,
) -> Result<PathBuf> {
    let output = output.unwrap_or_else(|| config.output_path.clone());
    debug!(count = identifiers.len(), output = %output.display(), "Starting export");

    let exporter = BatchExporter::new(provider)
        .with_concurrency(config.concurrency)
        .with_fetch_timeout(config.fetch_timeout());

    let pb = ui::new_progress_bar(identifiers.len() as u64, true);
    pb.set_message("Fetching funds...");
    let matrix = exporter
        .export_batch_with_progress(identifiers, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();
    let matrix = matrix?;

    let path = writer.write(&matrix, &output)?;
    println!(
        "File written to path : {}",
        ui::style_text(&path.display().to_string(), ui::StyleType::Success)
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_identifier_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("funds.txt");
        fs::write(&path, "# my funds\nVFIAX\n\n  FXAIX  \n#SWPPX\n")?;

        assert_eq!(read_identifier_file(&path)?, ids(&["VFIAX", "FXAIX"]));
        Ok(())
    }

    #[test]
    fn test_resolve_identifier_precedence() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("funds.txt");
        fs::write(&path, "FROMFILE\n")?;
        let watchlist = ids(&["WATCHED"]);

        assert_eq!(
            resolve_identifiers(ids(&["ARG"]), Some(&path), &watchlist)?,
            ids(&["ARG"])
        );
        assert_eq!(
            resolve_identifiers(vec![], Some(&path), &watchlist)?,
            ids(&["FROMFILE"])
        );
        assert_eq!(resolve_identifiers(vec![], None, &watchlist)?, watchlist);
        assert!(resolve_identifiers(vec![], None, &[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_identifier_file() {
        let result = resolve_identifiers(vec![], Some(Path::new("/no/such/funds.txt")), &[]);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read identifier file")
        );
    }
}
