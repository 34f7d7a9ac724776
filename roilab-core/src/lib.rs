//! RoiLab Core: ROI mean-reversion signal engine.
//!
//! This crate contains:
//! - Domain types (price series, indicator rows, actions)
//! - Signal configuration and validation
//! - Indicator engine: SMAs, ROI, rolling ROI mean, deviation, z-score, trend
//! - Signal engine: expanding-window percentile thresholds with price
//!   confirmation, and the realized P&L tracker
//! - Data providers (Yahoo Finance, CSV files, synthetic walk)
//! - Execution sinks (REST broker, paper broker)
//!
//! Typical use:
//!
//! ```
//! use roilab_core::{compute_indicators, evaluate_signals, PriceSeries, SignalConfig};
//!
//! let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices = PriceSeries::from_prices(start, &[100.0, 102.0, 104.0, 101.0, 99.0, 105.0]).unwrap();
//! let config = SignalConfig::new(2, 3, 4, 2, 10.0, 90.0).unwrap();
//! let indicators = compute_indicators(&prices, &config).unwrap();
//! let actions = evaluate_signals(&indicators, &prices, &config).unwrap();
//! assert_eq!(actions.len(), prices.len());
//! ```

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod execution;
pub mod fingerprint;
pub mod indicators;
pub mod signals;

pub use config::SignalConfig;
pub use domain::{
    Action, ActionSeries, IndicatorRow, IndicatorSeries, PricePoint, PriceSeries, Trend,
};
pub use error::CoreError;
pub use indicators::compute_indicators;
pub use signals::{
    evaluate_signals, profit_loss_report, realized_profit_loss, signal_thresholds,
    ProfitLossReport, Thresholds, UnmatchedSell,
};
