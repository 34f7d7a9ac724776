//! Artifact export: per-ticker `signals.csv` and the run's `summary.json`.
//!
//! Layout under the output directory:
//!
//! ```text
//! <out>/summary.json
//! <out>/<TICKER>/signals.csv
//! ```
//!
//! `summary.json` carries a `schema_version`; unknown versions are rejected on
//! load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::runner::{RunSummary, TickerReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_summary_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize RunSummary to JSON")
}

/// Deserialize a `RunSummary`, rejecting unknown schema versions.
pub fn import_summary_json(json: &str) -> Result<RunSummary> {
    let summary: RunSummary =
        serde_json::from_str(json).context("failed to deserialize RunSummary from JSON")?;
    if summary.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            summary.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(summary)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export one ticker's aligned indicators, thresholds and actions as CSV.
///
/// Columns: date, price, fast_sma, medium_sma, slow_sma, roi, roi_ma,
/// roi_ma_std, z_score, trend, buy_rate, sell_rate, action. Undefined values
/// are empty cells.
pub fn export_signals_csv(report: &TickerReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "price",
        "fast_sma",
        "medium_sma",
        "slow_sma",
        "roi",
        "roi_ma",
        "roi_ma_std",
        "z_score",
        "trend",
        "buy_rate",
        "sell_rate",
        "action",
    ])?;

    for (i, (point, row)) in report
        .prices
        .points()
        .iter()
        .zip(report.indicators.rows())
        .enumerate()
    {
        let thresholds = report.thresholds.get(i).copied().flatten();
        let action = report.actions.get(i).unwrap_or_default();
        wtr.write_record([
            point.date.to_string(),
            point.price.to_string(),
            opt(row.fast_sma),
            opt(row.medium_sma),
            opt(row.slow_sma),
            opt(row.roi),
            opt(row.roi_ma),
            opt(row.roi_ma_std),
            opt(row.z_score),
            format!("{:?}", row.trend),
            opt(thresholds.map(|t| t.buy_rate)),
            opt(thresholds.map(|t| t.sell_rate)),
            action.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

// ─── Directory layout ───────────────────────────────────────────────

/// Write every artifact of a run; returns the paths written.
pub fn write_artifacts(
    out_dir: &Path,
    summary: &RunSummary,
    reports: &[TickerReport],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(reports.len() + 1);

    for report in reports {
        let dir = out_dir.join(report.ticker.to_uppercase());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join("signals.csv");
        std::fs::write(&path, export_signals_csv(report)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    let path = out_dir.join("summary.json");
    std::fs::write(&path, export_summary_json(summary)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);

    info!(dir = %out_dir.display(), files = written.len(), "wrote artifacts");
    Ok(written)
}
