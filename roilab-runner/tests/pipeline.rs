//! Integration tests for the runner: provider → evaluation → artifacts → orders.
//!
//! Prices come from the synthetic provider, either directly or through CSV
//! files written to a temp directory, so nothing touches the network.

use chrono::NaiveDate;
use roilab_core::data::{
    write_series_csv, CsvProvider, DataError, DataProvider, DataSource, Interval, PriceField,
    SyntheticProvider,
};
use roilab_core::execution::PaperBroker;
use roilab_core::{PriceSeries, SignalConfig};
use roilab_runner::{
    dispatch_reports, evaluate_ticker, import_summary_json, run, write_artifacts, DispatchConfig,
    DispatchMode, RunConfig,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config(tickers: &[&str]) -> RunConfig {
    RunConfig {
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        start_date: date(2019, 1, 1),
        end_date: date(2023, 12, 31),
        interval: Interval::Weekly,
        signal: SignalConfig::new(5, 10, 20, 8, 10.0, 90.0).unwrap(),
        ..RunConfig::default()
    }
}

/// Provider that always fails for one ticker and delegates otherwise.
struct FlakyProvider {
    inner: SyntheticProvider,
    broken: &'static str,
}

impl DataProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        if ticker == self.broken {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }
        self.inner.fetch(ticker, start, end, interval)
    }
}

#[test]
fn csv_and_synthetic_agree() {
    let dir = tempfile::tempdir().unwrap();
    let synthetic = SyntheticProvider::default();
    let cfg = config(&["SPY"]);

    let daily = synthetic
        .fetch("SPY", cfg.start_date, cfg.end_date, Interval::Daily)
        .unwrap();
    let csv = CsvProvider::new(dir.path(), PriceField::Close);
    write_series_csv(&csv.path_for("SPY"), &daily, PriceField::Close).unwrap();

    let from_synthetic = evaluate_ticker(&synthetic, "SPY", &cfg).unwrap();
    let from_csv = evaluate_ticker(&csv, "SPY", &cfg).unwrap();

    assert_eq!(from_csv.source, DataSource::CsvFile);
    assert_eq!(from_csv.prices.len(), from_synthetic.prices.len());
    assert_eq!(from_csv.actions, from_synthetic.actions);
    assert!((from_csv.pnl.total - from_synthetic.pnl.total).abs() < 1e-6);
}

#[test]
fn failed_ticker_is_recorded_not_fatal() {
    let provider = FlakyProvider {
        inner: SyntheticProvider::default(),
        broken: "BAD",
    };
    let (summary, reports) = run(&provider, &config(&["SPY", "BAD", "QQQ"])).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(summary.tickers.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].ticker, "BAD");
    assert!(summary.failures[0].error.contains("BAD"));
}

#[test]
fn run_writes_readable_artifacts() {
    let out = tempfile::tempdir().unwrap();
    let (summary, reports) = run(&SyntheticProvider::default(), &config(&["SPY", "QQQ"])).unwrap();
    write_artifacts(out.path(), &summary, &reports).unwrap();

    let json = std::fs::read_to_string(out.path().join("summary.json")).unwrap();
    let back = import_summary_json(&json).unwrap();
    assert_eq!(back.run_id, summary.run_id);
    assert_eq!(back.tickers.len(), 2);

    for ticker in ["SPY", "QQQ"] {
        let csv = std::fs::read_to_string(out.path().join(ticker).join("signals.csv")).unwrap();
        let report = reports.iter().find(|r| r.ticker == ticker).unwrap();
        assert_eq!(csv.lines().count(), report.prices.len() + 1);
    }
}

#[test]
fn paper_dispatch_replays_every_trade() {
    let broker = PaperBroker::new();
    let (_, reports) = run(&SyntheticProvider::default(), &config(&["SPY"])).unwrap();
    let trades = reports[0].actions.iter().filter(|a| a.is_trade()).count();

    let dispatch = DispatchConfig {
        account_id: Some("paper".into()),
        mode: DispatchMode::All,
        ..DispatchConfig::default()
    };
    let confirmations = dispatch_reports(&broker, &reports, &dispatch, None).unwrap();
    assert_eq!(confirmations.len(), trades);
    assert_eq!(broker.tickets().len(), trades);
}

#[test]
fn run_id_stable_across_runs() {
    let cfg = config(&["SPY"]);
    let (a, _) = run(&SyntheticProvider::default(), &cfg).unwrap();
    let (b, _) = run(&SyntheticProvider::default(), &cfg).unwrap();
    assert_eq!(a.run_id, b.run_id);
    assert_eq!(a.tickers[0].dataset_hash, b.tickers[0].dataset_hash);
}
