//! Return on investment (ROI).
//!
//! Fractional change over N periods.
//! ROI[t] = value[t] / value[t-period] - 1
//! Lookback: period.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Roi {
    period: usize,
    name: String,
}

impl Roi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ROI period must be >= 1");
        Self {
            period,
            name: format!("roi_{period}"),
        }
    }
}

impl Indicator for Roi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        for i in self.period..n {
            result[i] = match (values[i - self.period], values[i]) {
                (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
                _ => None,
            };
        }

        result
    }
}
