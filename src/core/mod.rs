//! Fund record normalization and export pipeline

pub mod cache;
pub mod cell;
pub mod config;
pub mod export;
pub mod log;
pub mod normalize;
pub mod quote;
pub mod record;
pub mod schema;

// Re-export main types for cleaner imports
pub use cell::{Cell, coerce};
pub use export::{BatchExporter, ExportError, ExportMatrix};
pub use normalize::normalize;
pub use quote::{FundMatch, QuoteProvider, QuoteSummary, SearchProvider};
pub use record::{Holding, NormalizedRecord};
pub use schema::{Field, FieldSchema};
