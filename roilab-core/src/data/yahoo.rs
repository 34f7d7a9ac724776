//! Yahoo Finance data provider.
//!
//! Fetches prices from Yahoo's v8 chart API at daily, weekly or monthly
//! resolution. Handles rate limiting, retries with exponential backoff,
//! response parsing, and the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV provider is the fallback when Yahoo is unavailable.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, Interval, PriceField};
use crate::domain::{PricePoint, PriceSeries};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    price_field: PriceField,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new(circuit_breaker: Arc<CircuitBreaker>, price_field: PriceField) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            price_field,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Point the client at another host (a mirror or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the chart API URL for a ticker, date range and interval.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate, interval: Interval) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // Inclusive end: up to the last second of `end`.
        let end_ts = (end + chrono::Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        format!(
            "{}/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval={}\
             &includeAdjustedClose=true",
            self.base_url,
            interval.yahoo_code()
        )
    }

    /// Parse the chart API response into price points.
    ///
    /// Rows where the selected price is missing (holidays, partial rows) are
    /// dropped rather than carried as gaps.
    fn parse_response(
        ticker: &str,
        price_field: PriceField,
        resp: ChartResponse,
    ) -> Result<Vec<PricePoint>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::DataUnavailable {
                        ticker: ticker.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // A valid ticker with no rows in range comes back without timestamps.
        let Some(timestamps) = data.timestamp else {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        };

        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?
            .close;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let selected = match (price_field, adj_closes) {
            (PriceField::AdjClose, Some(adj)) => adj,
            (PriceField::AdjClose, None) => {
                warn!(ticker, "no adjusted close in response; using close");
                closes
            }
            (PriceField::Close, _) => closes,
        };

        let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

            let Some(price) = selected.get(i).copied().flatten() else {
                continue;
            };
            if !price.is_finite() || price <= 0.0 {
                continue;
            }
            // Yahoo occasionally repeats the live row with the same date.
            if points.last().is_some_and(|p| p.date >= date) {
                continue;
            }
            points.push(PricePoint::new(date, price));
        }

        if points.is_empty() {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }

        Ok(points)
    }

    /// Execute the HTTP request with retry and circuit breaker logic.
    fn fetch_with_retry(&self, ticker: &str, url: &str) -> Result<Vec<PricePoint>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(ticker, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        warn!(ticker, "Yahoo returned 403; tripping circuit breaker");
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::DataUnavailable {
                            ticker: ticker.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::Other(format!("HTTP {status} for {ticker}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {ticker}: {e}"
                        ))
                    })?;

                    let points = Self::parse_response(ticker, self.price_field, chart)?;
                    self.circuit_breaker.record_success();
                    return Ok(points);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other(format!("all retries failed for {ticker}"))))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn source(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        let url = self.chart_url(ticker, start, end, interval);
        let points = self.fetch_with_retry(ticker, &url)?;
        debug!(ticker, %interval, rows = points.len(), "fetched Yahoo prices");
        Ok(PriceSeries::new(points)?)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, field: PriceField) -> Result<Vec<PricePoint>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("SPY", field, resp)
    }

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704758400, 1705363200],
                "indicators": {
                    "quote": [{"close": [470.0, null, 480.0]}],
                    "adjclose": [{"adjclose": [465.0, 466.0, 475.0]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_selected_field_and_drops_gaps() {
        let close = parse(SAMPLE, PriceField::Close).unwrap();
        assert_eq!(close.len(), 2);
        assert_eq!(close[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(close[1].price, 480.0);

        let adj = parse(SAMPLE, PriceField::AdjClose).unwrap();
        assert_eq!(adj.iter().map(|p| p.price).collect::<Vec<_>>(), vec![465.0, 466.0, 475.0]);
    }

    #[test]
    fn not_found_maps_to_unavailable() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(matches!(
            parse(json, PriceField::Close),
            Err(DataError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn other_errors_map_to_format_change() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"oops"}}}"#;
        assert!(matches!(
            parse(json, PriceField::Close),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn missing_timestamps_is_unavailable() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        assert!(matches!(
            parse(json, PriceField::Close),
            Err(DataError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn chart_url_carries_interval_and_range() {
        let provider = YahooProvider::new(Arc::new(CircuitBreaker::default_provider()), PriceField::Close)
            .unwrap()
            .with_base_url("http://localhost:9/");
        let url = provider.chart_url(
            "SPY",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Interval::Weekly,
        );
        assert!(url.starts_with("http://localhost:9/v8/finance/chart/SPY?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704153599"));
        assert!(url.contains("interval=1wk"));
    }

    #[test]
    fn tripped_breaker_short_circuits() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        breaker.trip();
        let provider = YahooProvider::new(breaker, PriceField::Close).unwrap();
        assert!(!provider.is_available());
        let err = provider
            .fetch(
                "SPY",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                Interval::Daily,
            )
            .unwrap_err();
        assert!(matches!(err, DataError::CircuitBreakerTripped));
    }
}
