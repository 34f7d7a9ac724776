//! Signal configuration.
//!
//! One immutable parameter bundle per evaluation. Validation runs at every
//! engine entry point, so a hand-built or deserialized config can never reach
//! the computation in an invalid state.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Window sizes and percentile bounds for the indicator and signal engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Fast SMA period.
    pub fast_window: usize,
    /// Medium SMA period.
    pub medium_window: usize,
    /// Slow SMA period.
    pub slow_window: usize,
    /// Lookback for the ROI mean, its standard deviation, and the warm-up of
    /// the percentile rule.
    pub rolling_window_size: usize,
    /// Low percentile in [0, 100]; `roi_ma` at or below it is a buy zone.
    pub buy_percentile: f64,
    /// High percentile in [0, 100]; `roi_ma` at or above it is a sell zone.
    pub sell_percentile: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            fast_window: 10,
            medium_window: 20,
            slow_window: 50,
            rolling_window_size: 20,
            buy_percentile: 10.0,
            sell_percentile: 90.0,
        }
    }
}

impl SignalConfig {
    /// Build and validate in one step.
    pub fn new(
        fast_window: usize,
        medium_window: usize,
        slow_window: usize,
        rolling_window_size: usize,
        buy_percentile: f64,
        sell_percentile: f64,
    ) -> Result<Self, CoreError> {
        let config = Self {
            fast_window,
            medium_window,
            slow_window,
            rolling_window_size,
            buy_percentile,
            sell_percentile,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let windows = [
            ("fast_window", self.fast_window),
            ("medium_window", self.medium_window),
            ("slow_window", self.slow_window),
            ("rolling_window_size", self.rolling_window_size),
        ];
        for (name, value) in windows {
            if value < 1 {
                return Err(CoreError::InvalidConfig(format!("{name} must be >= 1")));
            }
        }

        // Strict ordering makes "fast > medium > slow" a meaningful uptrend test.
        if self.fast_window >= self.medium_window || self.medium_window >= self.slow_window {
            return Err(CoreError::InvalidConfig(format!(
                "SMA windows must be strictly increasing (fast {} < medium {} < slow {})",
                self.fast_window, self.medium_window, self.slow_window
            )));
        }

        for (name, value) in [
            ("buy_percentile", self.buy_percentile),
            ("sell_percentile", self.sell_percentile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be in [0, 100], got {value}"
                )));
            }
        }

        if self.buy_percentile >= self.sell_percentile {
            return Err(CoreError::InvalidConfig(format!(
                "buy_percentile ({}) must be below sell_percentile ({})",
                self.buy_percentile, self.sell_percentile
            )));
        }

        Ok(())
    }

    /// Index of the first slow SMA value; also the first defined trend.
    pub fn trend_warmup(&self) -> usize {
        self.slow_window - 1
    }
}
