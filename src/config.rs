use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{validate_interval_secs, RefreshConfig, DEFAULT_INTERVAL_SECS};
use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    #[serde(default)]
    pub refresh: RefreshSection,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub symbol: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSection {
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_auto_refresh() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_refresh_rate_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BinanceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl RefreshSection {
    pub fn to_refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            auto_refresh: self.auto_refresh,
            interval_secs: self.interval_secs,
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var("BTC_TICKER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    /// Parses and validates. The symbol is normalized to trimmed uppercase.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(s).context("failed to parse config toml")?;
        config.binance.symbol = config.binance.symbol.trim().to_ascii_uppercase();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.binance.symbol.is_empty() {
            return Err(AppError::Config("binance.symbol must not be empty".to_string()).into());
        }
        if self.binance.rest_base_url.trim().is_empty() {
            return Err(
                AppError::Config("binance.rest_base_url must not be empty".to_string()).into(),
            );
        }
        if self.binance.request_timeout_ms == 0 {
            return Err(
                AppError::Config("binance.request_timeout_ms must be > 0".to_string()).into(),
            );
        }
        validate_interval_secs(self.refresh.interval_secs)
            .context("refresh.interval_secs is invalid")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let toml_str = r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = " btcusdt "
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.binance.symbol, "BTCUSDT");
        assert_eq!(config.binance.request_timeout(), Duration::from_secs(5));
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 3);
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_zero_timeout() {
        let toml_str = r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = "BTCUSDT"
request_timeout_ms = 0
"#;
        assert!(Config::from_toml_str(toml_str).is_err());
    }
}
