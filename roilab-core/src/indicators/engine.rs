//! Indicator engine: price series in, aligned indicator rows out.
//!
//! Kernels are precomputed column by column, then zipped into rows. The
//! function is pure: same inputs, same output, no hidden state.

use super::{defined, Indicator, Roi, RollingDeviation, Sma};
use crate::config::SignalConfig;
use crate::domain::{IndicatorRow, IndicatorSeries, PriceSeries, Trend};
use crate::error::CoreError;
use tracing::debug;

/// Compute every indicator column for `prices` under `config`.
///
/// Fails with `InvalidConfig` before any computation when the config does not
/// validate.
pub fn compute_indicators(
    prices: &PriceSeries,
    config: &SignalConfig,
) -> Result<IndicatorSeries, CoreError> {
    config.validate()?;

    let raw = defined(&prices.prices());
    let window = config.rolling_window_size;

    let fast = Sma::new(config.fast_window).compute(&raw);
    let medium = Sma::new(config.medium_window).compute(&raw);
    let slow = Sma::new(config.slow_window).compute(&raw);
    let roi = Roi::new(1).compute(&raw);
    let roi_ma = Sma::new(window).compute(&roi);
    let roi_ma_std = RollingDeviation::std_dev(window).compute(&roi_ma);
    let z_score = RollingDeviation::z_score(window).compute(&roi_ma);

    let rows: Vec<IndicatorRow> = prices
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            price: point.price,
            fast_sma: fast[i],
            medium_sma: medium[i],
            slow_sma: slow[i],
            roi: roi[i],
            roi_ma: roi_ma[i],
            roi_ma_std: roi_ma_std[i],
            z_score: z_score[i],
            trend: Trend::classify(fast[i], medium[i], slow[i]),
        })
        .collect();

    debug!(
        len = rows.len(),
        fast = config.fast_window,
        medium = config.medium_window,
        slow = config.slow_window,
        window,
        "computed indicators"
    );

    Ok(IndicatorSeries::new(rows))
}
