//! Feature engineering — the join of price, index, and sentiment series.
//!
//! Builds one `DailyFeatureRow` per trading day:
//! 1. validate bars, dropping malformed rows with a logged warning
//! 2. outer-join stock and index closes on the union of dates,
//!    forward-filling whichever side is missing a date
//! 3. daily returns over the previous close (first row has none)
//! 4. per-day sentiment aggregates with a trailing rolling window
//! 5. relative performance = stock return minus index return
//!
//! Imputation policy: a date present in one price series but not the other
//! is forward-filled from the prior available value, never dropped
//! silently. Dates before a side's first observation are dropped (there is
//! nothing to fill from), with a warning.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    DailyFeatureRow, PerfCategory, PriceBar, SentimentCategory, SentimentRecord,
};
use crate::error::{DataQualityWarning, FeatureError};

/// Trailing window (in trading days) for the sentiment volatility column.
pub const DEFAULT_SENTIMENT_WINDOW: usize = 5;

/// The joined feature table plus the quality warnings accumulated while
/// building it. Rows are sorted by date and unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTable {
    pub rows: Vec<DailyFeatureRow>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Build the daily feature table from raw inputs.
pub fn build_features(
    stock_bars: &[PriceBar],
    index_bars: &[PriceBar],
    sentiment: &[SentimentRecord],
    sentiment_window: usize,
) -> Result<FeatureTable, FeatureError> {
    let mut warnings = Vec::new();

    let stock_closes = validate_closes(stock_bars, &mut warnings);
    let index_closes = validate_closes(index_bars, &mut warnings);

    if stock_closes.is_empty() {
        return Err(FeatureError::NoValidBars {
            symbol: stock_bars.first().map(|b| b.symbol.clone()).unwrap_or_default(),
        });
    }
    if index_closes.is_empty() {
        return Err(FeatureError::NoValidBars {
            symbol: index_bars.first().map(|b| b.symbol.clone()).unwrap_or_default(),
        });
    }

    // Union of dates across both series, forward-filled per side.
    let dates: BTreeSet<NaiveDate> = stock_closes
        .keys()
        .chain(index_closes.keys())
        .copied()
        .collect();

    let mut joined: Vec<(NaiveDate, f64, f64)> = Vec::with_capacity(dates.len());
    let mut last_stock: Option<f64> = None;
    let mut last_index: Option<f64> = None;

    for date in dates {
        if let Some(&c) = stock_closes.get(&date) {
            last_stock = Some(c);
        } else if last_stock.is_some() {
            push_warning(
                &mut warnings,
                format!("{date}: stock close missing, forward-filled from prior value"),
            );
        }
        if let Some(&c) = index_closes.get(&date) {
            last_index = Some(c);
        } else if last_index.is_some() {
            push_warning(
                &mut warnings,
                format!("{date}: index close missing, forward-filled from prior value"),
            );
        }

        match (last_stock, last_index) {
            (Some(s), Some(i)) => joined.push((date, s, i)),
            _ => push_warning(
                &mut warnings,
                format!("{date}: dropped, precedes first observation of one series"),
            ),
        }
    }

    // Per-day sentiment: mean score and item count.
    let mut day_scores: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for rec in sentiment {
        day_scores.entry(rec.date).or_default().push(rec.score);
    }

    let mut rows = Vec::with_capacity(joined.len());
    let mut avg_history: Vec<f64> = Vec::with_capacity(joined.len());
    let mut prev: Option<(f64, f64)> = None;

    for (date, close, index_close) in joined {
        let daily_return = prev.map(|(p, _)| close / p - 1.0);
        let index_daily_return = prev.map(|(_, p)| index_close / p - 1.0);
        let relative_performance = match (daily_return, index_daily_return) {
            (Some(r), Some(ir)) => Some(r - ir),
            _ => None,
        };

        let (avg_sentiment, news_count) = match day_scores.get(&date) {
            Some(scores) if !scores.is_empty() => {
                (scores.iter().sum::<f64>() / scores.len() as f64, scores.len())
            }
            _ => (0.0, 0),
        };
        avg_history.push(avg_sentiment);
        let sentiment_volatility = trailing_std(&avg_history, sentiment_window);

        rows.push(DailyFeatureRow {
            date,
            close,
            index_close,
            daily_return,
            index_daily_return,
            relative_performance,
            avg_sentiment,
            sentiment_volatility,
            news_count,
            perf_category: relative_performance.map(PerfCategory::from_relative_performance),
            sentiment_category: SentimentCategory::from_score(avg_sentiment),
        });

        prev = Some((close, index_close));
    }

    Ok(FeatureTable { rows, warnings })
}

/// Validate bars into a date → close map, dropping malformed rows with a
/// warning and deduplicating repeated dates (first wins).
fn validate_closes(
    bars: &[PriceBar],
    warnings: &mut Vec<DataQualityWarning>,
) -> BTreeMap<NaiveDate, f64> {
    let mut closes = BTreeMap::new();

    for bar in bars {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            push_warning(
                warnings,
                format!("{} {}: dropped bar with invalid close {}", bar.symbol, bar.date, bar.close),
            );
            continue;
        }
        if bar.high < bar.low {
            push_warning(
                warnings,
                format!("{} {}: dropped bar with high < low", bar.symbol, bar.date),
            );
            continue;
        }
        if closes.contains_key(&bar.date) {
            push_warning(
                warnings,
                format!("{} {}: duplicate date, kept first bar", bar.symbol, bar.date),
            );
            continue;
        }
        closes.insert(bar.date, bar.close);
    }

    closes
}

fn push_warning(warnings: &mut Vec<DataQualityWarning>, msg: String) {
    warn!("{msg}");
    warnings.push(DataQualityWarning(msg));
}

/// Sample standard deviation over the trailing `window` values of `history`
/// (current value included). 0.0 when fewer than two values are available.
fn trailing_std(history: &[f64], window: usize) -> f64 {
    let n = history.len();
    let start = n.saturating_sub(window.max(1));
    let slice = &history[start..];
    if slice.len() < 2 {
        return 0.0;
    }
    let mean = slice.iter().sum::<f64>() / slice.len() as f64;
    let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (slice.len() - 1) as f64;
    var.sqrt()
}
