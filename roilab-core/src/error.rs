//! Core error type.
//!
//! Every variant is fatal for the call that produced it: validation happens
//! before any computation starts. Warm-up gaps are never errors; they are
//! represented as `None` fields and `Action::Nothing`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("length mismatch: {indicators} indicator rows vs {prices} prices")]
    LengthMismatch { indicators: usize, prices: usize },

    #[error("price series is empty")]
    EmptySeries,

    #[error("timestamps not strictly increasing at index {index}")]
    UnorderedTimestamps { index: usize },

    #[error("invalid price {price} at index {index} (must be finite and > 0)")]
    InvalidPrice { index: usize, price: f64 },
}
