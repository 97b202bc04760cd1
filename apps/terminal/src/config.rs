//! # Configuration
//!
//! Settings for the terminal app, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_DATA_DIR=/tmp/tally                                          │
//! │     TALLY_STORAGE=memory                                               │
//! │     TALLY_STORAGE_KEY=tally.cart.session                               │
//! │     TALLY_CURRENCY_SYMBOL=€                                            │
//! │     TALLY_LOG=debug (falls back to RUST_LOG)                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TALLY_CONFIG, or                                                  │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! storage = "file"            # file | memory
//! data_dir = "/var/lib/tally"
//! storage_key = "tally.cart.session"
//! currency_symbol = "$"
//! log = "warn,tally=info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tally_core::Money;
use tally_store::DEFAULT_STORAGE_KEY;

use crate::error::{AppError, AppResult};

/// Default tracing filter: quiet, except for Tally's own info lines.
pub const DEFAULT_LOG_FILTER: &str = "warn,tally=info";

// =============================================================================
// Storage Backend
// =============================================================================

/// Where the cart snapshot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One file per key under the data directory.
    #[default]
    File,

    /// Process memory; nothing survives a restart.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            )),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageBackend,

    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// `tracing_subscriber::EnvFilter` directives.
    #[serde(default = "default_log_filter")]
    pub log: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage: StorageBackend::default(),
            data_dir: None,
            storage_key: default_storage_key(),
            currency_symbol: default_currency_symbol(),
            log: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads file and environment settings over the defaults.
    ///
    /// A missing default config file is fine; a missing file named by
    /// `TALLY_CONFIG`, or a malformed one, is an error.
    ///
    /// Runs before logging is initialized, so it does not log.
    pub fn load() -> AppResult<Self> {
        let env = |key: &str| std::env::var(key).ok();

        let mut config = match env("TALLY_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(env)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(path, e.to_string()))?;
        Self::from_toml(&contents).map_err(|message| AppError::config(path, message))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// Applies `TALLY_*` overrides read through `env`.
    pub fn apply_env_overrides<F>(&mut self, env: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = env("TALLY_STORAGE") {
            self.storage = backend
                .parse()
                .map_err(|message: String| AppError::config("TALLY_STORAGE", message))?;
        }

        if let Some(dir) = env("TALLY_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = env("TALLY_STORAGE_KEY") {
            self.storage_key = key;
        }

        if let Some(symbol) = env("TALLY_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(filter) = env("TALLY_LOG").or_else(|| env("RUST_LOG")) {
            self.log = filter;
        }

        Ok(())
    }

    /// The data directory: configured, or the platform default.
    pub fn resolve_data_dir(&self) -> AppResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| AppError::config("data_dir", "Could not determine app data directory"))
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Money;
    /// use tally_terminal::config::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123_456)), "$1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format(&self.currency_symbol)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.storage_key, "tally.cart.session");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.log, "warn,tally=info");
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml("currency_symbol = \"€\"\nstorage = \"memory\"").unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(AppConfig::from_toml("currency_symbol = ").is_err());
        assert!(AppConfig::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tally.toml");
        std::fs::write(&path, "data_dir = \"/srv/tally\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/tally")));
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/srv/tally"));

        let missing = AppConfig::from_file(&tmp.path().join("nope.toml"));
        assert!(matches!(missing, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env_from(&[
                ("TALLY_STORAGE", "Memory"),
                ("TALLY_STORAGE_KEY", "cart"),
                ("TALLY_CURRENCY_SYMBOL", "£"),
                ("TALLY_LOG", "debug"),
                ("RUST_LOG", "trace"),
            ]))
            .unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.currency_symbol, "£");
        assert_eq!(config.log, "debug");
    }

    #[test]
    fn test_rust_log_fallback() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env_from(&[("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.log, "trace");
    }

    #[test]
    fn test_unknown_backend_in_env() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(env_from(&[("TALLY_STORAGE", "cloud")]))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown storage backend"));
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig {
            currency_symbol: "€".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_cents(100)), "€1.00");
        assert_eq!(config.format_currency(Money::from_cents(123_456_789)), "€1,234,567.89");
    }
}
