//! End-to-end scenarios for the indicator and signal engines.

use chrono::NaiveDate;
use roilab_core::{
    compute_indicators, evaluate_signals, profit_loss_report, realized_profit_loss, Action,
    ActionSeries, PriceSeries, SignalConfig, Trend, UnmatchedSell,
};

fn series(prices: &[f64]) -> PriceSeries {
    PriceSeries::from_prices(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices).unwrap()
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "actual={actual}, expected={expected}"
    );
}

const PRICES: [f64; 10] = [100.0, 102.0, 104.0, 101.0, 99.0, 105.0, 110.0, 90.0, 85.0, 95.0];

fn scenario_config() -> SignalConfig {
    SignalConfig::new(2, 3, 4, 3, 10.0, 90.0).unwrap()
}

#[test]
fn reference_scenario_indicators() {
    let prices = series(&PRICES);
    let out = compute_indicators(&prices, &scenario_config()).unwrap();
    let rows = out.rows();

    approx(rows[3].fast_sma.unwrap(), (104.0 + 101.0) / 2.0);
    approx(rows[3].medium_sma.unwrap(), (102.0 + 104.0 + 101.0) / 3.0);
    approx(rows[3].slow_sma.unwrap(), (100.0 + 102.0 + 104.0 + 101.0) / 4.0);
    approx(rows[1].roi.unwrap(), 0.02);
    assert!(rows[0].roi.is_none());

    let roi3 = [102.0 / 100.0 - 1.0, 104.0 / 102.0 - 1.0, 101.0 / 104.0 - 1.0];
    approx(rows[3].roi_ma.unwrap(), roi3.iter().sum::<f64>() / 3.0);

    for row in &rows[..3] {
        assert_eq!(row.trend, Trend::Undefined);
    }
    // fast 102.5 > medium 102.33 > slow 101.75
    assert_eq!(rows[3].trend, Trend::Uptrend);
}

#[test]
fn reference_scenario_actions() {
    let prices = series(&PRICES);
    let config = scenario_config();
    let indicators = compute_indicators(&prices, &config).unwrap();
    let actions = evaluate_signals(&indicators, &prices, &config).unwrap();

    assert_eq!(actions.len(), PRICES.len());
    for i in 0..3 {
        assert_eq!(actions.get(i), Some(Action::Nothing), "warm-up at {i}");
    }
    for (i, action) in actions.iter().enumerate().skip(1) {
        match action {
            Action::Buy => assert!(PRICES[i] > PRICES[i - 1], "unconfirmed Buy at {i}"),
            Action::Sell => assert!(PRICES[i] < PRICES[i - 1], "unconfirmed Sell at {i}"),
            Action::Nothing => {}
        }
    }
}

#[test]
fn buy_on_slowing_rally() {
    // Three +10% steps, then a small gain: ROI mean at the bottom of its
    // history while price still rises.
    let prices = series(&[100.0, 110.0, 121.0, 133.1, 134.0]);
    let config = SignalConfig::new(2, 3, 4, 1, 10.0, 90.0).unwrap();
    let indicators = compute_indicators(&prices, &config).unwrap();
    let actions = evaluate_signals(&indicators, &prices, &config).unwrap();
    assert_eq!(actions.get(4), Some(Action::Buy));
}

#[test]
fn sell_on_slowing_decline() {
    // Three -10% steps, then a small loss: ROI mean at the top of its
    // history while price still falls.
    let prices = series(&[100.0, 90.0, 81.0, 72.9, 72.0]);
    let config = SignalConfig::new(2, 3, 4, 1, 10.0, 90.0).unwrap();
    let indicators = compute_indicators(&prices, &config).unwrap();
    let actions = evaluate_signals(&indicators, &prices, &config).unwrap();
    assert_eq!(actions.get(4), Some(Action::Sell));
}

#[test]
fn realized_pnl_reference() {
    let actions = ActionSeries::new(vec![Action::Nothing, Action::Buy, Action::Nothing, Action::Sell]);
    approx(realized_profit_loss(&actions, &series(&[10.0, 12.0, 13.0, 15.0])).unwrap(), 3.0);
}

#[test]
fn consecutive_sells_reuse_cost() {
    let actions = ActionSeries::new(vec![Action::Buy, Action::Sell, Action::Nothing, Action::Sell]);
    let prices = series(&[10.0, 11.0, 9.0, 14.0]);
    let report = profit_loss_report(&actions, &prices, UnmatchedSell::ReuseLastCost).unwrap();
    // (11 - 10) + (14 - 10): the second Sell books against the old cost.
    approx(report.total, 5.0);
    assert_eq!(report.unmatched_sells, 1);

    let ignored = profit_loss_report(&actions, &prices, UnmatchedSell::Ignore).unwrap();
    approx(ignored.total, 1.0);
}
