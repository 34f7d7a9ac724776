//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window. An output is defined only when every
//! input in its window is defined.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        let mut sum = 0.0;
        let mut defined_in_window = 0usize;
        let mut since_anchor = 0usize;

        for i in 0..n {
            if let Some(v) = values[i] {
                sum += v;
                defined_in_window += 1;
            }
            if i >= self.period {
                if let Some(leaving) = values[i - self.period] {
                    sum -= leaving;
                    defined_in_window -= 1;
                }
            }

            if i + 1 < self.period || defined_in_window < self.period {
                continue;
            }

            // Re-anchor the running sum once per window length so add/subtract
            // rounding error cannot accumulate over long series.
            since_anchor += 1;
            if since_anchor >= self.period {
                sum = values[(i + 1 - self.period)..=i].iter().flatten().sum();
                since_anchor = 0;
            }

            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}
