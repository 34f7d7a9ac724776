//! RoiLab Runner: run configuration, evaluation, artifacts, order dispatch.
//!
//! This crate builds on `roilab-core` to provide:
//! - TOML run configuration with content-addressed run ids
//! - Per-ticker evaluation and parallel multi-ticker runs
//! - `signals.csv` / `summary.json` export
//! - Dispatch of Buy/Sell actions to an execution sink

pub mod config;
pub mod dispatch;
pub mod export;
pub mod runner;

pub use config::{ConfigError, DispatchConfig, DispatchMode, RunConfig, RunId};
pub use dispatch::{build_tickets, dispatch_reports, submit_all};
pub use export::{export_signals_csv, export_summary_json, import_summary_json, write_artifacts};
pub use runner::{
    evaluate_series, evaluate_ticker, evaluate_universe, run, RunError, RunSummary,
    TickerFailure, TickerReport, TickerSummary, SCHEMA_VERSION,
};
