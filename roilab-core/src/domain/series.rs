//! PriceSeries: the ordered input to every evaluation.

use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observation: the selected price of an instrument at a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered, validated sequence of price points.
///
/// # Invariants
/// - non-empty
/// - dates strictly increasing (no duplicates)
/// - every price finite and > 0 (ROI divides by the previous price)
///
/// The fields are private so the invariants can only be established through
/// [`PriceSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptySeries);
        }
        for (index, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(CoreError::InvalidPrice {
                    index,
                    price: point.price,
                });
            }
            if index > 0 && point.date <= points[index - 1].date {
                return Err(CoreError::UnorderedTimestamps { index });
            }
        }
        Ok(Self { points })
    }

    /// Build a series from bare prices on consecutive days starting at `start`.
    pub fn from_prices(start: NaiveDate, prices: &[f64]) -> Result<Self, CoreError> {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn price(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|p| p.price)
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.points.get(index).map(|p| p.date)
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// Series restricted to the first `len` points (at least one is kept).
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.clamp(1, self.points.len());
        Self {
            points: self.points[..len].to_vec(),
        }
    }

    /// Drop the final point, typically a still-forming bar.
    ///
    /// Returns `None` if that would leave the series empty.
    pub fn without_last(&self) -> Option<Self> {
        if self.points.len() < 2 {
            return None;
        }
        Some(Self {
            points: self.points[..self.points.len() - 1].to_vec(),
        })
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }
        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}
