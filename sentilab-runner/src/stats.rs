//! Exploratory statistics — pure functions over the feature table.
//!
//! Pearson correlation with two-sided p-values (t-statistic through the
//! Student's-t CDF), a full matrix over the numeric feature columns, and
//! the headline sentiment-vs-relative-performance pair.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use sentilab_core::domain::DailyFeatureRow;

/// Names of the numeric columns included in the correlation matrix,
/// in matrix order.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "close",
    "index_close",
    "daily_return",
    "index_daily_return",
    "relative_performance",
    "avg_sentiment",
    "sentiment_volatility",
    "news_count",
];

/// A single correlation with its significance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correlation {
    pub var_a: String,
    pub var_b: String,
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

impl Correlation {
    pub fn is_significant(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Results of the exploratory pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// All pairwise correlations (upper triangle, matrix order).
    pub pairs: Vec<Correlation>,
    /// The headline pair: avg_sentiment vs relative_performance.
    pub sentiment_vs_relative_perf: Option<Correlation>,
}

/// Pearson correlation coefficient. None when fewer than three paired
/// observations exist or either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 3 {
        return None;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];

    let mx = xs.iter().sum::<f64>() / n as f64;
    let my = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return None;
    }

    Some((cov / (vx * vy).sqrt()).clamp(-1.0, 1.0))
}

/// Two-sided p-value for a Pearson r with n observations, via the
/// t-distribution with n-2 degrees of freedom.
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denom = (1.0 - r * r).max(f64::EPSILON);
    let t = r.abs() * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Correlate two named columns, pairing only rows where both are present.
fn correlate(name_a: &str, xs: &[f64], name_b: &str, ys: &[f64]) -> Option<Correlation> {
    let r = pearson(xs, ys)?;
    let n = xs.len().min(ys.len());
    Some(Correlation {
        var_a: name_a.to_string(),
        var_b: name_b.to_string(),
        r,
        p_value: pearson_p_value(r, n),
        n,
    })
}

/// Extract a named numeric column; rows with a null value in either of the
/// return-derived columns yield None and are skipped by the caller.
fn column_value(row: &DailyFeatureRow, name: &str) -> Option<f64> {
    match name {
        "close" => Some(row.close),
        "index_close" => Some(row.index_close),
        "daily_return" => row.daily_return,
        "index_daily_return" => row.index_daily_return,
        "relative_performance" => row.relative_performance,
        "avg_sentiment" => Some(row.avg_sentiment),
        "sentiment_volatility" => Some(row.sentiment_volatility),
        "news_count" => Some(row.news_count as f64),
        _ => None,
    }
}

/// Build paired series for two columns, dropping rows where either is null.
fn paired_columns(rows: &[DailyFeatureRow], a: &str, b: &str) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::with_capacity(rows.len());
    let mut ys = Vec::with_capacity(rows.len());
    for row in rows {
        if let (Some(x), Some(y)) = (column_value(row, a), column_value(row, b)) {
            xs.push(x);
            ys.push(y);
        }
    }
    (xs, ys)
}

/// Run the exploratory correlation pass over the feature table.
pub fn correlation_report(rows: &[DailyFeatureRow]) -> CorrelationReport {
    let mut pairs = Vec::new();

    for (i, a) in NUMERIC_COLUMNS.iter().enumerate() {
        for b in &NUMERIC_COLUMNS[i + 1..] {
            let (xs, ys) = paired_columns(rows, a, b);
            if let Some(corr) = correlate(a, &xs, b, &ys) {
                pairs.push(corr);
            }
        }
    }

    let sentiment_vs_relative_perf = pairs
        .iter()
        .find(|c| {
            (c.var_a == "avg_sentiment" && c.var_b == "relative_performance")
                || (c.var_a == "relative_performance" && c.var_b == "avg_sentiment")
        })
        .cloned();

    CorrelationReport {
        pairs,
        sentiment_vs_relative_perf,
    }
}

/// The strongest correlations by absolute r, for the report.
pub fn strongest(report: &CorrelationReport, top: usize) -> Vec<Correlation> {
    let mut sorted = report.pairs.clone();
    sorted.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
    sorted.truncate(top);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use sentilab_core::domain::SentimentCategory;

    fn row(day: u32, ret: f64, iret: f64, sentiment: f64) -> DailyFeatureRow {
        DailyFeatureRow {
            date: NaiveDate::from_ymd_opt(2022, 1, day).unwrap(),
            close: 100.0 * (1.0 + ret),
            index_close: 1000.0 * (1.0 + iret),
            daily_return: Some(ret),
            index_daily_return: Some(iret),
            relative_performance: Some(ret - iret),
            avg_sentiment: sentiment,
            sentiment_volatility: 0.1,
            news_count: 1,
            perf_category: None,
            sentiment_category: SentimentCategory::from_score(sentiment),
        }
    }

    #[test]
    fn perfect_positive_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_negative_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_no_correlation() {
        let xs = [1.0, 1.0, 1.0, 1.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!(pearson(&xs, &ys).is_none());
    }

    #[test]
    fn too_few_points_has_no_correlation() {
        assert!(pearson(&[1.0, 2.0], &[2.0, 1.0]).is_none());
    }

    #[test]
    fn strong_correlation_is_significant() {
        // Near-perfect linear relationship on 20 points
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 0.1 * (x % 3.0)).collect();
        let r = pearson(&xs, &ys).unwrap();
        let p = pearson_p_value(r, xs.len());
        assert!(p < 0.001);
    }

    #[test]
    fn weak_correlation_is_not_significant() {
        let r = 0.1;
        let p = pearson_p_value(r, 10);
        assert!(p > 0.05);
    }

    #[test]
    fn report_skips_null_return_rows() {
        let mut rows: Vec<DailyFeatureRow> =
            (1..=20).map(|d| row(d, 0.01 * d as f64, 0.005 * d as f64, 0.1)).collect();
        rows[0].daily_return = None;
        rows[0].relative_performance = None;

        let report = correlation_report(&rows);
        let pair = report
            .pairs
            .iter()
            .find(|c| c.var_a == "daily_return" && c.var_b == "index_daily_return")
            .unwrap();
        assert_eq!(pair.n, 19);
    }

    #[test]
    fn headline_pair_is_extracted() {
        // Make sentiment track relative performance so the pair correlates
        let rows: Vec<DailyFeatureRow> = (1..=25)
            .map(|d| {
                let ret = (d as f64 * 0.7).sin() * 0.02;
                row(d, ret, 0.0, ret * 30.0)
            })
            .collect();

        let report = correlation_report(&rows);
        let pair = report.sentiment_vs_relative_perf.unwrap();
        assert!(pair.r > 0.9);
        assert!(pair.is_significant());
    }

    proptest! {
        /// r stays in [-1, 1] and its p-value in [0, 1] for arbitrary series.
        #[test]
        fn pearson_stays_in_unit_interval(
            xs in proptest::collection::vec(-1e6f64..1e6, 3..50),
            ys in proptest::collection::vec(-1e6f64..1e6, 3..50),
        ) {
            if let Some(r) = pearson(&xs, &ys) {
                prop_assert!((-1.0..=1.0).contains(&r));
                let p = pearson_p_value(r, xs.len().min(ys.len()));
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn strongest_sorts_by_absolute_r() {
        let rows: Vec<DailyFeatureRow> =
            (1..=25).map(|d| row(d, 0.01 * d as f64, -0.01 * d as f64, 0.0)).collect();
        let report = correlation_report(&rows);
        let top = strongest(&report, 3);
        assert_eq!(top.len(), 3);
        assert!(top[0].r.abs() >= top[1].r.abs());
        assert!(top[1].r.abs() >= top[2].r.abs());
    }
}
