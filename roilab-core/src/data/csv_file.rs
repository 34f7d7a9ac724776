//! CSV price files: `{dir}/{TICKER}.csv` with `date,close[,adj_close]`.

use super::provider::{DataError, DataProvider, DataSource, Interval, PriceField};
use super::resample::resample;
use crate::domain::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    adj_close: Option<f64>,
}

/// Reads daily (or already sampled) price files from a directory.
///
/// Rows whose selected price is empty are dropped. `AdjClose` falls back to
/// `close` when the file has no adjusted column.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
    price_field: PriceField,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>, price_field: PriceField) -> Self {
        Self {
            dir: dir.into(),
            price_field,
        }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.to_ascii_uppercase()))
    }

    fn read_points(&self, path: &Path) -> Result<Vec<PricePoint>, DataError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut points = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record?;
            let price = match self.price_field {
                PriceField::Close => row.close,
                PriceField::AdjClose => row.adj_close.or(row.close),
            };
            if let Some(price) = price.filter(|p| p.is_finite()) {
                points.push(PricePoint::new(row.date, price));
            }
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvFile
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }

        let points: Vec<PricePoint> = self
            .read_points(&path)?
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();
        let points = resample(&points, interval);
        debug!(ticker, path = %path.display(), rows = points.len(), "read CSV prices");

        if points.is_empty() {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }
        Ok(PriceSeries::new(points)?)
    }
}

fn column_name(field: PriceField) -> &'static str {
    match field {
        PriceField::Close => "close",
        PriceField::AdjClose => "adj_close",
    }
}

/// Write a series as `date,close` or `date,adj_close`, labelled by the field
/// its prices were taken from, so it can be read back by [`CsvProvider`].
pub fn write_series_csv(
    path: &Path,
    series: &PriceSeries,
    field: PriceField,
) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", column_name(field)])?;
    for point in series.points() {
        writer.write_record([point.date.to_string(), format!("{}", point.price)])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_filters_and_selects_field() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("SPY.csv"),
            "date,close,adj_close\n\
             2024-01-02,100.0,99.0\n\
             2024-01-03,,98.0\n\
             2024-01-04,102.0,\n\
             2024-02-01,103.0,101.0\n",
        )
        .unwrap();

        let close = CsvProvider::new(dir.path(), PriceField::Close)
            .fetch("spy", date(2024, 1, 1), date(2024, 1, 31), Interval::Daily)
            .unwrap();
        assert_eq!(close.prices(), vec![100.0, 102.0]);

        let adj = CsvProvider::new(dir.path(), PriceField::AdjClose)
            .fetch("SPY", date(2024, 1, 1), date(2024, 12, 31), Interval::Daily)
            .unwrap();
        assert_eq!(adj.prices(), vec![99.0, 98.0, 102.0, 101.0]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvProvider::new(dir.path(), PriceField::Close)
            .fetch("NOPE", date(2024, 1, 1), date(2024, 2, 1), Interval::Daily)
            .unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn empty_range_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("QQQ.csv"), "date,close\n2020-01-02,1.0\n").unwrap();
        let err = CsvProvider::new(dir.path(), PriceField::Close)
            .fetch("QQQ", date(2024, 1, 1), date(2024, 2, 1), Interval::Weekly)
            .unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let series = PriceSeries::from_prices(date(2024, 3, 1), &[10.0, 10.5, 11.25]).unwrap();
        let provider = CsvProvider::new(dir.path(), PriceField::AdjClose);
        write_series_csv(&provider.path_for("ABC"), &series, PriceField::AdjClose).unwrap();
        let back = provider
            .fetch("ABC", date(2024, 1, 1), date(2024, 12, 31), Interval::Daily)
            .unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn adjusted_file_is_not_read_as_close() {
        let dir = tempfile::tempdir().unwrap();
        let series = PriceSeries::from_prices(date(2024, 3, 1), &[10.0, 10.5, 11.25]).unwrap();
        let close = CsvProvider::new(dir.path(), PriceField::Close);
        write_series_csv(&close.path_for("ABC"), &series, PriceField::AdjClose).unwrap();

        let header = std::fs::read_to_string(close.path_for("ABC")).unwrap();
        assert!(header.starts_with("date,adj_close\n"), "{header}");

        let err = close
            .fetch("ABC", date(2024, 1, 1), date(2024, 12, 31), Interval::Daily)
            .unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn close_file_serves_both_readers() {
        let dir = tempfile::tempdir().unwrap();
        let series = PriceSeries::from_prices(date(2024, 3, 1), &[20.0, 21.0]).unwrap();
        let close = CsvProvider::new(dir.path(), PriceField::Close);
        write_series_csv(&close.path_for("XYZ"), &series, PriceField::Close).unwrap();

        let from = date(2024, 1, 1);
        let to = date(2024, 12, 31);
        assert_eq!(close.fetch("XYZ", from, to, Interval::Daily).unwrap(), series);
        // Adjusted readers fall back to close when no adjusted column exists.
        let adj = CsvProvider::new(dir.path(), PriceField::AdjClose);
        assert_eq!(adj.fetch("XYZ", from, to, Interval::Daily).unwrap(), series);
    }
}
