pub mod util;
pub mod yahoo_finance;

// Re-export the cache for providers
pub use crate::core::cache::Cache;
