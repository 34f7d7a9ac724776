//! Indicator kernels and the indicator engine.
//!
//! Every kernel implements [`Indicator`]: an optional-valued series in, an
//! optional-valued series of the same length out. `None` marks both missing
//! input and warm-up, so kernels chain without special casing: the ROI mean
//! is an SMA over the ROI series, whose first entry is undefined.

pub mod deviation;
pub mod engine;
pub mod roi;
pub mod sma;

pub use deviation::{DeviationOutput, RollingDeviation};
pub use engine::compute_indicators;
pub use roi::Roi;
pub use sma::Sma;

/// Trait for indicator kernels.
///
/// # Look-ahead contamination guard
/// No output at index t may depend on input at t+1 or later. Every kernel
/// must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "roi_1").
    fn name(&self) -> &str;

    /// Number of leading outputs that are always `None` for fully defined input.
    fn lookback(&self) -> usize;

    /// Compute over the whole input. Output has the same length as `values`.
    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// Lift raw prices into the kernel input shape.
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
