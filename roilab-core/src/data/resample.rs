//! Down-sampling of daily observations.
//!
//! Each weekly (ISO week) or monthly bucket is represented by its last
//! observation, so the sampled price is the period's closing price.

use super::provider::Interval;
use crate::domain::PricePoint;
use chrono::{Datelike, NaiveDate};

fn bucket(date: NaiveDate, interval: Interval) -> (i32, u32) {
    match interval {
        Interval::Daily => (date.year(), date.ordinal()),
        Interval::Weekly => {
            let week = date.iso_week();
            (week.year(), week.week())
        }
        Interval::Monthly => (date.year(), date.month()),
    }
}

/// Keep the last point of every `interval` bucket. Input must be date-ordered.
pub fn resample(points: &[PricePoint], interval: Interval) -> Vec<PricePoint> {
    let mut out: Vec<PricePoint> = Vec::new();
    let mut current: Option<(i32, u32)> = None;

    for point in points {
        let key = bucket(point.date, interval);
        if current == Some(key) {
            if let Some(last) = out.last_mut() {
                *last = *point;
            }
        } else {
            out.push(*point);
            current = Some(key);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, price: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), price)
    }

    #[test]
    fn daily_is_identity() {
        let pts = vec![point(2024, 1, 1, 1.0), point(2024, 1, 2, 2.0)];
        assert_eq!(resample(&pts, Interval::Daily), pts);
    }

    #[test]
    fn weekly_keeps_last_of_iso_week() {
        // 2024-01-01 is a Monday.
        let pts = vec![
            point(2024, 1, 1, 1.0),
            point(2024, 1, 3, 2.0),
            point(2024, 1, 5, 3.0),
            point(2024, 1, 8, 4.0),
            point(2024, 1, 9, 5.0),
        ];
        let out = resample(&pts, Interval::Weekly);
        assert_eq!(out, vec![point(2024, 1, 5, 3.0), point(2024, 1, 9, 5.0)]);
    }

    #[test]
    fn monthly_keeps_last_of_month() {
        let pts = vec![
            point(2023, 12, 29, 1.0),
            point(2024, 1, 2, 2.0),
            point(2024, 1, 31, 3.0),
            point(2024, 2, 1, 4.0),
        ];
        let out = resample(&pts, Interval::Monthly);
        assert_eq!(
            out,
            vec![point(2023, 12, 29, 1.0), point(2024, 1, 31, 3.0), point(2024, 2, 1, 4.0)]
        );
    }

    #[test]
    fn weekly_across_year_boundary() {
        // 2024-12-30 (Mon) and 2025-01-02 (Thu) share ISO week 2025-W01.
        let pts = vec![point(2024, 12, 30, 1.0), point(2025, 1, 2, 2.0)];
        assert_eq!(resample(&pts, Interval::Weekly), vec![point(2025, 1, 2, 2.0)]);
    }
}
