//! Rolling sample standard deviation and z-score.
//!
//! Two outputs (separate Indicator instances), both over the same window:
//! - StdDev: sample standard deviation (divide by N-1)
//! - ZScore: (value[t] - mean(window)) / stddev(window)
//!
//! Each window is recomputed with a two-pass mean/deviation scheme, which
//! avoids the cancellation of the sum-of-squares formula on long windows.
//! Output is `None` when the window has a gap, when period < 2, or when the
//! deviation is zero (below `MIN_STD`).
//! Lookback: period - 1.

use super::Indicator;

/// Deviations at or below this are treated as zero.
pub const MIN_STD: f64 = 1e-12;

/// Which output of the rolling deviation to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviationOutput {
    StdDev,
    ZScore,
}

#[derive(Debug, Clone)]
pub struct RollingDeviation {
    period: usize,
    output: DeviationOutput,
    name: String,
}

impl RollingDeviation {
    pub fn std_dev(period: usize) -> Self {
        assert!(period >= 1, "deviation period must be >= 1");
        Self {
            period,
            output: DeviationOutput::StdDev,
            name: format!("std_{period}"),
        }
    }

    pub fn z_score(period: usize) -> Self {
        assert!(period >= 1, "deviation period must be >= 1");
        Self {
            period,
            output: DeviationOutput::ZScore,
            name: format!("zscore_{period}"),
        }
    }
}

/// Mean and sample standard deviation of a fully defined window.
fn window_stats(window: &[f64]) -> Option<(f64, f64)> {
    let n = window.len();
    if n < 2 {
        return None;
    }
    let mean = window.iter().sum::<f64>() / n as f64;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    let std = variance.sqrt();
    (std > MIN_STD).then_some((mean, std))
}

impl Indicator for RollingDeviation {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];

        if n < self.period || self.period < 2 {
            return result;
        }

        let mut window = Vec::with_capacity(self.period);
        for i in (self.period - 1)..n {
            window.clear();
            window.extend(values[(i + 1 - self.period)..=i].iter().flatten());
            if window.len() < self.period {
                continue;
            }

            let Some((mean, std)) = window_stats(&window) else {
                continue;
            };

            result[i] = match self.output {
                DeviationOutput::StdDev => Some(std),
                DeviationOutput::ZScore => Some((window[self.period - 1] - mean) / std),
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, defined, DEFAULT_EPSILON};

    #[test]
    fn sample_std_basic() {
        // Window [2, 4, 6]: mean 4, sample variance (4 + 0 + 4) / 2 = 4, std 2.
        let result = RollingDeviation::std_dev(3).compute(&defined(&[2.0, 4.0, 6.0, 8.0]));
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_approx(result[2].unwrap(), 2.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn z_score_of_last_value() {
        // Window [2, 4, 6]: (6 - 4) / 2 = 1.
        let result = RollingDeviation::z_score(3).compute(&defined(&[2.0, 4.0, 6.0]));
        assert_approx(result[2].unwrap(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_window_is_undefined() {
        let result = RollingDeviation::z_score(3).compute(&defined(&[5.0, 5.0, 5.0, 5.0]));
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn period_one_has_no_sample_std() {
        let result = RollingDeviation::std_dev(1).compute(&defined(&[1.0, 2.0]));
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn gap_in_window_is_undefined() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(6.0)];
        let result = RollingDeviation::std_dev(2).compute(&values);
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert!(result[3].is_some());
    }

    #[test]
    fn stable_for_large_offsets() {
        // Values near 1e9 with unit spread: naive sum-of-squares loses all precision here.
        let base = 1e9;
        let result =
            RollingDeviation::std_dev(3).compute(&defined(&[base + 2.0, base + 4.0, base + 6.0]));
        assert_approx(result[2].unwrap(), 2.0, 1e-6);
    }
}
