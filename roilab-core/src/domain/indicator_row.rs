//! Per-index indicator records.

use serde::{Deserialize, Serialize};

/// Ordering of the three moving averages at one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
    #[default]
    Undefined,
}

impl Trend {
    /// Classify from the three SMAs. Any missing average yields `Undefined`.
    pub fn classify(fast: Option<f64>, medium: Option<f64>, slow: Option<f64>) -> Self {
        match (fast, medium, slow) {
            (Some(f), Some(m), Some(s)) => {
                if f > m && m > s {
                    Trend::Uptrend
                } else if f < m && m < s {
                    Trend::Downtrend
                } else {
                    Trend::Sideways
                }
            }
            _ => Trend::Undefined,
        }
    }
}

/// All derived statistics at a single index.
///
/// A float field is `None` until its rolling window is fully covered by
/// prior data. `trend` is `Undefined` unless all three SMAs are defined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub price: f64,
    pub fast_sma: Option<f64>,
    pub medium_sma: Option<f64>,
    pub slow_sma: Option<f64>,
    pub roi: Option<f64>,
    pub roi_ma: Option<f64>,
    pub roi_ma_std: Option<f64>,
    pub z_score: Option<f64>,
    pub trend: Trend,
}

/// Indicator rows aligned index-for-index with the source price series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn new(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&IndicatorRow> {
        self.rows.get(index)
    }

    pub fn roi_ma_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.roi_ma).collect()
    }

    pub fn roi_column(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.roi).collect()
    }

    /// Latest row, if any.
    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}
