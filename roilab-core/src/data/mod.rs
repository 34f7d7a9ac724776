//! Price data retrieval.
//!
//! Providers sit behind the [`DataProvider`] trait so the runner can swap the
//! Yahoo client for CSV files or a synthetic walk, and tests never touch the
//! network.

pub mod circuit_breaker;
pub mod csv_file;
pub mod provider;
pub mod resample;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_file::{write_series_csv, CsvProvider};
pub use provider::{DataError, DataProvider, DataSource, Interval, PriceField};
pub use resample::resample;
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
