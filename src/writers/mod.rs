//! Serializers from an [`ExportMatrix`] to a file.

pub mod xlsx;

use crate::core::ExportMatrix;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use xlsx::XlsxWriter;

pub trait SheetWriter {
    /// Writes `matrix` to `path` and returns the location written.
    fn write(&self, matrix: &ExportMatrix, path: &Path) -> Result<PathBuf>;
}
