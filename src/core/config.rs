use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: PathBuf,
    pub sheet_name: String,
    pub concurrency: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_path: PathBuf::from("my-mf-sheet.xlsx"),
            sheet_name: "My fund worksheet".to_string(),
            concurrency: crate::core::export::DEFAULT_CONCURRENCY,
            fetch_timeout_secs: crate::core::export::DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl ExportConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// A zero timeout would fail every fetch; zero concurrency would never start one.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == 0 {
            bail!("export.fetch_timeout_secs must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("export.concurrency must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Watchlist exported when no symbols are given on the command line.
    #[serde(default)]
    pub funds: Vec<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "mfsheet", "mfsheet")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .export
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
funds:
  - VFIAX
  - FXAIX
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
export:
  output_path: "/tmp/funds.xlsx"
  concurrency: 8
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.funds, vec!["VFIAX", "FXAIX"]);
        assert_eq!(config.providers.yahoo_base_url(), "http://example.com/yahoo");
        assert_eq!(config.export.output_path, PathBuf::from("/tmp/funds.xlsx"));
        assert_eq!(config.export.concurrency, 8);
        assert_eq!(config.export.sheet_name, "My fund worksheet");
        assert_eq!(config.export.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.funds.is_empty());
        assert_eq!(config.providers.yahoo_base_url(), DEFAULT_YAHOO_BASE_URL);
        assert_eq!(config.export.output_path, PathBuf::from("my-mf-sheet.xlsx"));
        assert_eq!(config.export.concurrency, 4);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "export:\n  fetch_timeout_secs: 0\n").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config file"));
        assert_eq!(
            err.root_cause().to_string(),
            "export.fetch_timeout_secs must be at least 1"
        );
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config: AppConfig = serde_yaml::from_str("export:\n  concurrency: 0\n").unwrap();
        assert!(config.export.validate().is_err());
        assert!(AppConfig::default().export.validate().is_ok());
    }
}
