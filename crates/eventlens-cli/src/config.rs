//! CLI configuration file
//!
//! ```toml
//! fixtures = "data/fixtures.json"
//! log_level = "info"
//! show_unchanged = true
//!
//! [app]
//! clear_comparison_on_close = true
//! log_transitions = true
//! ```
//!
//! Every key is optional and the file itself may be absent. Command-line
//! flags override file values.

use anyhow::{Context, Result};
use eventlens_app::AppConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of `.eventlens/config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Fixture file backing the data source
    pub fixtures: Option<PathBuf>,
    /// Log filter used when neither `--verbose` nor `RUST_LOG` is given
    pub log_level: Option<String>,
    /// Print diff rows whose values match
    pub show_unchanged: bool,
    /// Store configuration
    pub app: AppConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            fixtures: None,
            log_level: None,
            show_unchanged: true,
            app: AppConfig::default(),
        }
    }
}

impl CliConfig {
    /// Parse a config document.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse config")
    }

    /// Load the config at `path`, or the defaults if there is no such file.
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::from_toml(&raw)
                .with_context(|| format!("Invalid config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = CliConfig::from_toml(
            r#"
            fixtures = "data/demo.json"
            log_level = "debug"
            show_unchanged = false

            [app]
            clear_comparison_on_close = false
            "#,
        )
        .unwrap();
        assert_eq!(config.fixtures, Some(PathBuf::from("data/demo.json")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(!config.show_unchanged);
        assert!(!config.app.clear_comparison_on_close);
        assert!(config.app.log_transitions);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(CliConfig::from_toml("fixture = \"typo.json\"").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();
        let config = CliConfig::load(file.path()).await.unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }
}
