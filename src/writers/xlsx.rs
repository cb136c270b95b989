use super::SheetWriter;
use crate::core::{Cell, ExportMatrix};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Excel rejects longer strings.
const MAX_CELL_TEXT: usize = 32_767;

pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
        }
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &Cell,
        format: Option<&Format>,
    ) -> Result<()> {
        match (cell, format) {
            (Cell::Empty, _) => return Ok(()),
            (Cell::Text(s), _) if s.chars().count() > MAX_CELL_TEXT => {
                warn!(row, col, len = s.len(), "Text too long for a cell, leaving it empty");
                return Ok(());
            }
            (Cell::Text(s), Some(format)) => {
                worksheet.write_string_with_format(row, col, s, format)?;
            }
            (Cell::Text(s), None) => {
                worksheet.write_string(row, col, s)?;
            }
            (Cell::Number(n), _) => {
                worksheet.write_number(row, col, *n)?;
            }
            (Cell::Bool(b), _) => {
                worksheet.write_boolean(row, col, *b)?;
            }
        }
        Ok(())
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new("My fund worksheet")
    }
}

impl SheetWriter for XlsxWriter {
    fn write(&self, matrix: &ExportMatrix, path: &Path) -> Result<PathBuf> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook
            .add_worksheet()
            .set_name(&self.sheet_name)
            .with_context(|| format!("Invalid sheet name: {}", self.sheet_name))?;

        for (row_idx, row) in matrix.rows().iter().enumerate() {
            let row32 = u32::try_from(row_idx).context("Too many rows for a worksheet")?;
            let format = (row_idx == 0).then_some(&header_format);
            for (col_idx, cell) in row.iter().enumerate() {
                let col16 = u16::try_from(col_idx).context("Too many columns for a worksheet")?;
                Self::write_cell(worksheet, row32, col16, cell, format).with_context(|| {
                    format!("Failed to write cell ({row_idx}, {col_idx})")
                })?;
            }
        }
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();

        workbook
            .save(path)
            .with_context(|| format!("Failed to save XLSX file: {}", path.display()))?;
        debug!(rows = matrix.len(), path = %path.display(), "Wrote workbook");
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BatchExporter, FieldSchema, QuoteProvider};
    use async_trait::async_trait;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use tempfile::TempDir;

    /// Every symbol resolves to "Fund <symbol>" except FUNDY, which fails.
    struct FixtureProvider;

    #[async_trait]
    impl QuoteProvider for FixtureProvider {
        async fn fetch_raw(&self, symbol: &str) -> anyhow::Result<serde_json::Value> {
            if symbol == "FUNDY" {
                anyhow::bail!("No quote data found for symbol: {symbol}");
            }
            Ok(serde_json::json!({
                "quoteType": {"longName": format!("Fund {symbol}")},
                "fundPerformance": {"trailingReturns": {"threeYear": {"raw": 12.5}}}
            }))
        }
    }

    #[tokio::test]
    async fn test_written_sheet_reads_back_in_order() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("funds.xlsx");

        let symbols = ["FUNDZ", "FUNDY", "FUNDX"].map(String::from);
        let matrix = BatchExporter::new(&FixtureProvider)
            .export_batch(&symbols)
            .await?;

        let written = XlsxWriter::new("Funds").write(&matrix, &path)?;
        assert_eq!(written, path);

        let mut workbook: Xlsx<_> = open_workbook(&path)?;
        assert_eq!(workbook.sheet_names(), vec!["Funds".to_string()]);
        let range = workbook.worksheet_range("Funds")?;
        let mut rows = range.rows();

        let header: Vec<String> = rows
            .next()
            .expect("header row")
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(header, FieldSchema::ordered_names());

        let return_3y = FieldSchema::position(crate::core::Field::Return3y).unwrap();
        let data: Vec<&[Data]> = rows.collect();
        assert_eq!(data.len(), symbols.len());
        for (row, symbol) in data.iter().zip(&symbols) {
            assert_eq!(row[0], Data::String(symbol.clone()));
        }
        assert_eq!(data[0][1], Data::String("Fund FUNDZ".to_string()));
        assert_eq!(data[0][return_3y], Data::Float(12.5));
        assert!(data[1][1..].iter().all(|c| *c == Data::Empty));
        assert_eq!(data[2][1], Data::String("Fund FUNDX".to_string()));
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_sheet_name() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("funds.xlsx");

        let result = XlsxWriter::new("bad[name]").write(&ExportMatrix::new(), &path);
        assert!(result.is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_skips_oversized_text() -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let long = Cell::Text("x".repeat(MAX_CELL_TEXT + 1));

        XlsxWriter::write_cell(worksheet, 0, 0, &long, None)?;
        XlsxWriter::write_cell(worksheet, 0, 1, &Cell::Number(1.5), None)?;
        XlsxWriter::write_cell(worksheet, 0, 2, &Cell::Bool(true), None)?;
        Ok(())
    }
}
