//! Percentiles over an expanding window.

/// Percentile of a sorted slice using linear interpolation between order
/// statistics: rank = p/100 * (n-1).
///
/// Returns `None` for an empty slice or a `p` outside `[0, 100]`.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&p) {
        return None;
    }
    let n = sorted.len();
    match n {
        0 => None,
        1 => Some(sorted[0]),
        _ => {
            let rank = (p / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = rank - lo as f64;
            Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
        }
    }
}

/// Sorted buffer of every value observed so far.
///
/// Each `push` is a binary search plus one insertion, so the window never has
/// to be re-sorted. Queries see exactly the values pushed before them.
#[derive(Debug, Clone, Default)]
pub struct ExpandingPercentiles {
    sorted: Vec<f64>,
}

impl ExpandingPercentiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sorted: Vec::with_capacity(capacity),
        }
    }

    /// Add an observation. Non-finite values are ignored.
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let at = self.sorted.partition_point(|&v| v <= value);
        self.sorted.insert(at, value);
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn percentile(&self, p: f64) -> Option<f64> {
        percentile_sorted(&self.sorted, p)
    }
}
