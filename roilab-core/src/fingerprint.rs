//! Deterministic identification of inputs.
//!
//! - `dataset_hash`: BLAKE3 over every (date, price) pair of a series.
//! - `config_hash`: BLAKE3 over the canonical JSON of a signal config.
//!
//! Two evaluations with equal hashes produce identical indicator and action
//! series, so reports can be deduplicated or compared across runs.

use crate::config::SignalConfig;
use crate::domain::PriceSeries;

pub fn dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for point in series.points() {
        hasher.update(point.date.to_string().as_bytes());
        hasher.update(&point.price.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

pub fn config_hash(config: &SignalConfig) -> String {
    // Struct field order is fixed, so the JSON form is canonical.
    let json = serde_json::to_string(config).unwrap_or_default();
    blake3::hash(json.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_prices(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices).unwrap()
    }

    #[test]
    fn dataset_hash_is_deterministic_and_sensitive() {
        let a = dataset_hash(&series(&[1.0, 2.0]));
        assert_eq!(a, dataset_hash(&series(&[1.0, 2.0])));
        assert_ne!(a, dataset_hash(&series(&[1.0, 2.000001])));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn config_hash_changes_with_params() {
        let base = SignalConfig::default();
        let mut other = base.clone();
        other.rolling_window_size += 1;
        assert_eq!(config_hash(&base), config_hash(&base.clone()));
        assert_ne!(config_hash(&base), config_hash(&other));
    }
}
