//! `mfsheet setup`: writes a starter config with a fund watchlist, the Yahoo base URL
//! and the export settings.

use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::debug;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the starter config where `AppConfig::load` looks for it
/// (`~/.config/mfsheet/config.yaml` on Linux).
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(&path)?;
    println!(
        "Config written to {}. Edit `funds` to change what `mfsheet export` fetches.",
        path.display()
    );
    Ok(())
}

/// Writes the starter config to `path`, creating missing parent directories.
/// An existing config is never replaced.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("Refusing to overwrite existing config at {}", path.display())
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to create config file {}", path.display()));
        }
    };
    file.write_all(EXAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    debug!(path = %path.display(), "Wrote example config");
    Ok(())
}
