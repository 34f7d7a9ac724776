//! Signal generation: percentile breach confirmed by price direction.
//!
//! Signals never look forward: the threshold in force at index t is built
//! from indicator values at indices strictly before t.

pub mod engine;
pub mod percentile;
pub mod pnl;

pub use engine::{evaluate_signals, signal_thresholds, Thresholds};
pub use percentile::{percentile_sorted, ExpandingPercentiles};
pub use pnl::{
    profit_loss_report, realized_profit_loss, PositionState, ProfitLossReport, RoundTrip,
    UnmatchedSell,
};
