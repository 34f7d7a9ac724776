//! Serializable run configuration.
//!
//! A run evaluates one signal configuration over a list of tickers and a date
//! range. The whole struct is loaded from TOML; every section except
//! `tickers`, `start_date` and `end_date` has defaults, so a minimal file is:
//!
//! ```toml
//! tickers = ["SPY", "QQQ"]
//! start_date = "2018-01-01"
//! end_date = "2023-12-31"
//! ```

use chrono::NaiveDate;
use roilab_core::data::{Interval, PriceField};
use roilab_core::{SignalConfig, UnmatchedSell};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Default REST order endpoint root.
pub const DEFAULT_BROKER_URL: &str = "https://api.tdameritrade.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which Buy/Sell actions become orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Only the action on the most recent bar, if it is a trade.
    #[default]
    Latest,
    /// Every Buy/Sell in the series, in order.
    All,
}

/// Order dispatch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Brokerage account; may instead come from the environment at dispatch time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub quantity: u32,
    pub mode: DispatchMode,
    pub base_url: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            quantity: 1,
            mode: DispatchMode::Latest,
            base_url: DEFAULT_BROKER_URL.to_string(),
        }
    }
}

/// Everything needed to reproduce a run.
///
/// Field order matters for TOML output: plain values precede the
/// `[signal]` and `[dispatch]` tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub tickers: Vec<String>,

    /// Start date (inclusive).
    pub start_date: NaiveDate,

    /// End date (inclusive).
    pub end_date: NaiveDate,

    #[serde(default)]
    pub interval: Interval,

    #[serde(default)]
    pub price_field: PriceField,

    /// Drop the final bar of each fetched series; it may still be forming.
    #[serde(default = "default_drop_last_bar")]
    pub drop_last_bar: bool,

    #[serde(default)]
    pub pnl_policy: UnmatchedSell,

    #[serde(default)]
    pub signal: SignalConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

fn default_drop_last_bar() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: vec!["SPY".to_string()],
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            interval: Interval::Weekly,
            price_field: PriceField::AdjClose,
            drop_last_bar: true,
            pnl_policy: UnmatchedSell::ReuseLastCost,
            signal: SignalConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a run configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a run configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("tickers must not be empty".into()));
        }
        for (i, ticker) in self.tickers.iter().enumerate() {
            if ticker.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("tickers[{i}] is empty")));
            }
            if self.tickers[..i].iter().any(|t| t.eq_ignore_ascii_case(ticker)) {
                return Err(ConfigError::Invalid(format!("duplicate ticker '{ticker}'")));
            }
        }
        if self.start_date >= self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date ({}) must be before end_date ({})",
                self.start_date, self.end_date
            )));
        }
        self.signal
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.dispatch.quantity == 0 {
            return Err(ConfigError::Invalid("dispatch.quantity must be >= 1".into()));
        }
        if self.dispatch.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("dispatch.base_url is empty".into()));
        }
        Ok(())
    }

    /// Deterministic hash of the configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        // A RunConfig holds only strings, dates, integers, finite floats and
        // unit enums, none of which can fail to serialize.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
