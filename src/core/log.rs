//! Diagnostics for the `mfsheet` binary.
//!
//! Events go to stderr, keeping stdout clean for `quote --json` and `quote --raw`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Silent by default. `--verbose` shows debug events from `mfsheet` only (per-fund fetch
/// spans, retries, skipped sections); a set `RUST_LOG` replaces both behaviours.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = env_filter.is_none().then(|| {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::OFF
        };
        Targets::new()
            .with_target("mfsheet", level)
            .with_default(LevelFilter::OFF)
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}
