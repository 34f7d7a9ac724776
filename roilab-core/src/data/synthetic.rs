//! Deterministic synthetic prices for offline development and tests.
//!
//! A random walk of daily returns on weekdays, seeded from the BLAKE3 hash of
//! the ticker so the same ticker always produces the same series.

use super::provider::{DataError, DataProvider, DataSource, Interval};
use super::resample::resample;
use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    /// Daily returns are drawn uniformly from `[-max_daily_move, max_daily_move)`.
    max_daily_move: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }
}

impl SyntheticProvider {
    fn daily_points(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut points = Vec::new();
        let mut price = self.start_price;
        let mut current = start;
        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                points.push(PricePoint::new(current, price));
                let daily_return: f64 = if self.max_daily_move > 0.0 {
                    rng.gen_range(-self.max_daily_move..self.max_daily_move)
                } else {
                    0.0
                };
                price *= 1.0 + daily_return;
            }
            current += chrono::Duration::days(1);
        }
        points
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        let points = resample(&self.daily_points(ticker, start, end), interval);
        if points.is_empty() {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }
        Ok(PriceSeries::new(points)?)
    }
}
