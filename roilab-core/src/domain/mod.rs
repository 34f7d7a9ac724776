//! Domain types for RoiLab

pub mod action;
pub mod indicator_row;
pub mod series;

pub use action::{Action, ActionSeries};
pub use indicator_row::{IndicatorRow, IndicatorSeries, Trend};
pub use series::{PricePoint, PriceSeries};
