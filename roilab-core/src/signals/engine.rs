//! Signal engine: rolling ROI mean vs expanding-window percentiles.
//!
//! At index t the thresholds are percentiles of every defined `roi_ma` at
//! indices `0..t`. The current value is excluded, so a decision only uses
//! information available when it is made.

use super::percentile::ExpandingPercentiles;
use crate::config::SignalConfig;
use crate::domain::{Action, ActionSeries, IndicatorSeries, PriceSeries};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percentile pair in force at one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// `buy_percentile` of the expanding window.
    pub buy_rate: f64,
    /// `sell_percentile` of the expanding window.
    pub sell_rate: f64,
    /// Number of prior `roi_ma` values the percentiles were taken over.
    pub sample_size: usize,
}

/// Thresholds for every index, `None` during warm-up or while no prior
/// `roi_ma` value exists.
pub fn signal_thresholds(
    indicators: &IndicatorSeries,
    config: &SignalConfig,
) -> Result<Vec<Option<Thresholds>>, CoreError> {
    config.validate()?;

    let rows = indicators.rows();
    let mut window = ExpandingPercentiles::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let thresholds = if i < config.rolling_window_size {
            None
        } else {
            match (
                window.percentile(config.buy_percentile),
                window.percentile(config.sell_percentile),
            ) {
                (Some(buy_rate), Some(sell_rate)) => Some(Thresholds {
                    buy_rate,
                    sell_rate,
                    sample_size: window.len(),
                }),
                _ => None,
            }
        };
        out.push(thresholds);

        // Pushed after the query: index i only ever sees roi_ma[0..i].
        if let Some(v) = row.roi_ma {
            window.push(v);
        }
    }

    Ok(out)
}

/// Decision rule for one index.
///
/// - Buy: ROI mean at or below the buy threshold while price turns up.
/// - Sell: ROI mean at or above the sell threshold while price turns down.
pub fn decide(roi_ma: Option<f64>, thresholds: Option<Thresholds>, price: f64, prev_price: f64) -> Action {
    let (Some(roi_ma), Some(t)) = (roi_ma, thresholds) else {
        return Action::Nothing;
    };

    if roi_ma <= t.buy_rate && price > prev_price {
        Action::Buy
    } else if roi_ma >= t.sell_rate && price < prev_price {
        Action::Sell
    } else {
        Action::Nothing
    }
}

/// Evaluate the action at every index.
///
/// The first `rolling_window_size` actions are always `Nothing`.
pub fn evaluate_signals(
    indicators: &IndicatorSeries,
    prices: &PriceSeries,
    config: &SignalConfig,
) -> Result<ActionSeries, CoreError> {
    config.validate()?;
    if indicators.len() != prices.len() {
        return Err(CoreError::LengthMismatch {
            indicators: indicators.len(),
            prices: prices.len(),
        });
    }

    let thresholds = signal_thresholds(indicators, config)?;
    let points = prices.points();

    let actions: Vec<Action> = indicators
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if i == 0 {
                return Action::Nothing;
            }
            decide(row.roi_ma, thresholds[i], points[i].price, points[i - 1].price)
        })
        .collect();

    let actions = ActionSeries::new(actions);
    debug!(
        len = actions.len(),
        buys = actions.count(Action::Buy),
        sells = actions.count(Action::Sell),
        "evaluated signals"
    );
    Ok(actions)
}
