//! Artifact export — JSON manifest, CSV tables, chart series.
//!
//! Every persisted manifest carries a `schema_version` field; unknown
//! versions are rejected on load. CSV exports render null numeric columns
//! as empty fields so downstream tools see proper missing values.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use sentilab_core::domain::DailyFeatureRow;

use crate::report::generate_report;
use crate::runner::{PipelineResult, SCHEMA_VERSION};

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `PipelineResult` to pretty JSON.
pub fn export_json(result: &PipelineResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize PipelineResult to JSON")
}

/// Deserialize a `PipelineResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<PipelineResult> {
    let result: PipelineResult =
        serde_json::from_str(json).context("failed to deserialize PipelineResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

/// Export the daily feature table as CSV.
///
/// Columns: date, close, index_close, daily_return, index_daily_return,
/// relative_performance, avg_sentiment, sentiment_volatility, news_count,
/// perf_category, sentiment_category. Null returns and the null category of
/// the first row are empty fields.
pub fn export_features_csv(rows: &[DailyFeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "close",
        "index_close",
        "daily_return",
        "index_daily_return",
        "relative_performance",
        "avg_sentiment",
        "sentiment_volatility",
        "news_count",
        "perf_category",
        "sentiment_category",
    ])?;

    for row in rows {
        wtr.write_record([
            &row.date.to_string(),
            &format!("{:.6}", row.close),
            &format!("{:.6}", row.index_close),
            &opt(row.daily_return),
            &opt(row.index_daily_return),
            &opt(row.relative_performance),
            &format!("{:.6}", row.avg_sentiment),
            &format!("{:.6}", row.sentiment_volatility),
            &row.news_count.to_string(),
            row.perf_category.map(|c| c.label()).unwrap_or(""),
            row.sentiment_category.label(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the price chart series: both closes rebased to 100 at the first
/// row, so the stock and the index plot on the same axis.
pub fn export_chart_prices_csv(rows: &[DailyFeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "close", "index_close", "close_rebased", "index_rebased"])?;

    let base = rows.first().map(|r| (r.close, r.index_close));
    for row in rows {
        let (base_close, base_index) = base.unwrap_or((row.close, row.index_close));
        wtr.write_record([
            &row.date.to_string(),
            &format!("{:.6}", row.close),
            &format!("{:.6}", row.index_close),
            &format!("{:.4}", 100.0 * row.close / base_close),
            &format!("{:.4}", 100.0 * row.index_close / base_index),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the sentiment chart series: daily sentiment against relative
/// performance, for the overlay plot.
pub fn export_chart_sentiment_csv(rows: &[DailyFeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "avg_sentiment",
        "sentiment_volatility",
        "news_count",
        "relative_performance",
    ])?;

    for row in rows {
        wtr.write_record([
            &row.date.to_string(),
            &format!("{:.6}", row.avg_sentiment),
            &format!("{:.6}", row.sentiment_volatility),
            &row.news_count.to_string(),
            &opt(row.relative_performance),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a pipeline run.
///
/// Creates a directory named `{stock}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json` — the full `PipelineResult`
/// - `features.csv` — the daily feature table
/// - `chart_prices.csv` — rebased price series for plotting
/// - `chart_sentiment.csv` — sentiment vs relative performance series
/// - `report.md` — the human-readable analysis report
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &PipelineResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.config.stock_symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("features.csv"), export_features_csv(&result.rows)?)?;
    std::fs::write(
        run_dir.join("chart_prices.csv"),
        export_chart_prices_csv(&result.rows)?,
    )?;
    std::fs::write(
        run_dir.join("chart_sentiment.csv"),
        export_chart_sentiment_csv(&result.rows)?,
    )?;
    std::fs::write(run_dir.join("report.md"), generate_report(result))?;

    Ok(run_dir)
}

/// Load a `PipelineResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<PipelineResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}
