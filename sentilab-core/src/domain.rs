//! Domain types shared across the pipeline.
//!
//! Everything here is plain data: created once by a provider or the feature
//! builder, never mutated afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol. Immutable once fetched; may be synthetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A single news headline/snippet about an issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: NaiveDate,
    pub issuer: String,
    pub headline: String,
    pub source: String,
}

/// Sentiment assigned to one news item. Score is in [-1, 1], positive = favorable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub score: f64,
    pub confidence: Option<f64>,
}

/// Where a dataset came from. Surfaced in logs and the final report so
/// synthetic output is never mistaken for real market analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceMode {
    Real,
    Synthetic,
}

impl DataSourceMode {
    pub fn is_synthetic(self) -> bool {
        matches!(self, DataSourceMode::Synthetic)
    }
}

impl std::fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceMode::Real => write!(f, "real"),
            DataSourceMode::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Relative-performance bucket: stock return vs index return, binned at ±1%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerfCategory {
    Underperform,
    Neutral,
    Outperform,
}

impl PerfCategory {
    /// Bin a relative-performance value. Bins follow the ±0.01 cut points.
    pub fn from_relative_performance(rp: f64) -> Self {
        if rp < -0.01 {
            PerfCategory::Underperform
        } else if rp > 0.01 {
            PerfCategory::Outperform
        } else {
            PerfCategory::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerfCategory::Underperform => "underperform",
            PerfCategory::Neutral => "neutral_perf",
            PerfCategory::Outperform => "outperform",
        }
    }
}

/// Sentiment bucket, binned at ±1/3 on the daily average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    pub fn from_score(score: f64) -> Self {
        if score < -1.0 / 3.0 {
            SentimentCategory::Negative
        } else if score > 1.0 / 3.0 {
            SentimentCategory::Positive
        } else {
            SentimentCategory::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentCategory::Negative => "negative_news",
            SentimentCategory::Neutral => "neutral_news",
            SentimentCategory::Positive => "positive_news",
        }
    }
}

/// One row of the joined feature table — the unit consumed by every
/// downstream analysis module and the schema of the CSV artifact.
///
/// Invariants:
/// - `date` is unique and strictly increasing within a table
/// - `relative_performance == daily_return - index_daily_return` on every
///   row where both returns are present
/// - the first row of a table has `daily_return == None` (no prior close)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatureRow {
    pub date: NaiveDate,
    pub close: f64,
    pub index_close: f64,
    pub daily_return: Option<f64>,
    pub index_daily_return: Option<f64>,
    pub relative_performance: Option<f64>,
    pub avg_sentiment: f64,
    pub sentiment_volatility: f64,
    pub news_count: usize,
    pub perf_category: Option<PerfCategory>,
    pub sentiment_category: SentimentCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_category_bins() {
        assert_eq!(
            PerfCategory::from_relative_performance(-0.05),
            PerfCategory::Underperform
        );
        assert_eq!(
            PerfCategory::from_relative_performance(0.0),
            PerfCategory::Neutral
        );
        assert_eq!(
            PerfCategory::from_relative_performance(0.011),
            PerfCategory::Outperform
        );
        // Boundary values fall in the neutral band
        assert_eq!(
            PerfCategory::from_relative_performance(-0.01),
            PerfCategory::Neutral
        );
        assert_eq!(
            PerfCategory::from_relative_performance(0.01),
            PerfCategory::Neutral
        );
    }

    #[test]
    fn sentiment_category_bins() {
        assert_eq!(SentimentCategory::from_score(-0.9), SentimentCategory::Negative);
        assert_eq!(SentimentCategory::from_score(0.0), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_score(0.5), SentimentCategory::Positive);
    }

    #[test]
    fn mode_display() {
        assert_eq!(DataSourceMode::Real.to_string(), "real");
        assert_eq!(DataSourceMode::Synthetic.to_string(), "synthetic");
        assert!(DataSourceMode::Synthetic.is_synthetic());
        assert!(!DataSourceMode::Real.is_synthetic());
    }
}
