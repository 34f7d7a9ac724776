//! Single-ticker and multi-ticker evaluation.
//!
//! `evaluate_ticker` is the full pipeline for one instrument: fetch, optionally
//! drop the still-forming bar, compute indicators, thresholds and actions, and
//! book realized P&L. `evaluate_universe` fans that out across tickers with
//! rayon; one ticker failing never aborts the others.

use chrono::NaiveDate;
use rayon::prelude::*;
use roilab_core::data::{DataError, DataProvider, DataSource};
use roilab_core::execution::ExecutionError;
use roilab_core::fingerprint::{config_hash, dataset_hash};
use roilab_core::{
    compute_indicators, evaluate_signals, profit_loss_report, signal_thresholds, Action,
    ActionSeries, CoreError, IndicatorSeries, PriceSeries, ProfitLossReport, Thresholds,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, RunConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("evaluation error: {0}")]
    Core(#[from] CoreError),
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),
    #[error("no account id configured for order dispatch")]
    MissingAccount,
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything computed for one ticker.
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub prices: PriceSeries,
    pub indicators: IndicatorSeries,
    pub thresholds: Vec<Option<Thresholds>>,
    pub actions: ActionSeries,
    pub pnl: ProfitLossReport,
}

impl TickerReport {
    /// Action on the most recent bar with its date and price.
    pub fn latest(&self) -> Option<(NaiveDate, Action, f64)> {
        let last = self.prices.len().checked_sub(1)?;
        Some((
            self.prices.date(last)?,
            self.actions.get(last)?,
            self.prices.price(last)?,
        ))
    }

    pub fn summary(&self) -> TickerSummary {
        let latest = self.latest();
        TickerSummary {
            ticker: self.ticker.clone(),
            source: self.source,
            bars: self.prices.len(),
            first_date: self.prices.first_date(),
            last_date: self.prices.last_date(),
            buys: self.actions.count(Action::Buy),
            sells: self.actions.count(Action::Sell),
            latest_action: latest.map(|(_, a, _)| a).unwrap_or_default(),
            latest_price: latest.map(|(_, _, p)| p).unwrap_or_default(),
            realized_pnl: self.pnl.total,
            round_trips: self.pnl.round_trips.len(),
            unmatched_sells: self.pnl.unmatched_sells,
            win_rate: self.pnl.win_rate(),
            dataset_hash: self.dataset_hash.clone(),
        }
    }
}

/// Compact per-ticker result, the unit of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub source: DataSource,
    pub bars: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub buys: usize,
    pub sells: usize,
    pub latest_action: Action,
    pub latest_price: f64,
    pub realized_pnl: f64,
    pub round_trips: usize,
    pub unmatched_sells: usize,
    pub win_rate: Option<f64>,
    pub dataset_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: String,
}

/// Result of a whole run, serialized as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub run_id: String,
    pub signal_config_hash: String,
    pub config: RunConfig,
    pub tickers: Vec<TickerSummary>,
    pub failures: Vec<TickerFailure>,
    pub elapsed_ms: u64,
}

/// Evaluate an already-loaded series. No I/O.
pub fn evaluate_series(
    ticker: &str,
    source: DataSource,
    prices: PriceSeries,
    config: &RunConfig,
) -> Result<TickerReport, RunError> {
    let prices = if config.drop_last_bar {
        prices.without_last().ok_or(CoreError::EmptySeries)?
    } else {
        prices
    };

    let indicators = compute_indicators(&prices, &config.signal)?;
    let thresholds = signal_thresholds(&indicators, &config.signal)?;
    let actions = evaluate_signals(&indicators, &prices, &config.signal)?;
    let pnl = profit_loss_report(&actions, &prices, config.pnl_policy)?;

    debug!(
        ticker,
        bars = prices.len(),
        realized_pnl = pnl.total,
        "evaluated ticker"
    );

    Ok(TickerReport {
        ticker: ticker.to_string(),
        source,
        dataset_hash: dataset_hash(&prices),
        prices,
        indicators,
        thresholds,
        actions,
        pnl,
    })
}

/// Fetch and evaluate one ticker.
pub fn evaluate_ticker(
    provider: &dyn DataProvider,
    ticker: &str,
    config: &RunConfig,
) -> Result<TickerReport, RunError> {
    let prices = provider.fetch(ticker, config.start_date, config.end_date, config.interval)?;
    info!(
        ticker,
        provider = provider.name(),
        bars = prices.len(),
        "fetched prices"
    );
    evaluate_series(ticker, provider.source(), prices, config)
}

/// Evaluate every configured ticker in parallel.
///
/// Results come back in the order of `config.tickers`.
pub fn evaluate_universe(
    provider: &dyn DataProvider,
    config: &RunConfig,
) -> Vec<(String, Result<TickerReport, RunError>)> {
    config
        .tickers
        .par_iter()
        .map(|ticker| {
            let result = evaluate_ticker(provider, ticker, config);
            if let Err(e) = &result {
                warn!(ticker = %ticker, error = %e, "ticker evaluation failed");
            }
            (ticker.clone(), result)
        })
        .collect()
}

/// Validate the config, evaluate the universe and collect a summary.
///
/// Per-ticker failures are recorded in the summary, not returned as errors.
pub fn run(
    provider: &dyn DataProvider,
    config: &RunConfig,
) -> Result<(RunSummary, Vec<TickerReport>), RunError> {
    config.validate()?;
    let started = Instant::now();
    let run_id = config.run_id();
    info!(run_id = %&run_id[..12], tickers = config.tickers.len(), "starting run");

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (ticker, result) in evaluate_universe(provider, config) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => failures.push(TickerFailure {
                ticker,
                error: e.to_string(),
            }),
        }
    }

    let summary = RunSummary {
        schema_version: SCHEMA_VERSION,
        run_id,
        signal_config_hash: config_hash(&config.signal),
        config: config.clone(),
        tickers: reports.iter().map(TickerReport::summary).collect(),
        failures,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        evaluated = summary.tickers.len(),
        failed = summary.failures.len(),
        elapsed_ms = summary.elapsed_ms,
        "run complete"
    );
    Ok((summary, reports))
}
