//! Pipeline orchestration: acquisition, scoring, features, analysis.
//!
//! One call runs the whole pipeline for a validated config. Acquisition
//! failures degrade to synthetic substitutes and are recorded in the result;
//! only configuration problems (and a feature table with no usable bars)
//! abort the run.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use sentilab_core::data;
use sentilab_core::domain::{DailyFeatureRow, DataSourceMode};
use sentilab_core::error::{DataQualityWarning, FeatureError};
use sentilab_core::features::build_features;
use sentilab_core::news;
use sentilab_core::seeds::SeedForge;
use sentilab_core::sentiment::{self, score_news};

use crate::classify::{classification_report, ClassificationReport};
use crate::cluster::{cluster_report, ClusterReport};
use crate::config::{ConfigError, RunConfig, RunId};
use crate::patterns::{mine_patterns, PatternReport};
use crate::stats::{correlation_report, CorrelationReport};

/// Bumped whenever the serialized result shape changes. Imports check it.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("feature construction failed: {0}")]
    Features(#[from] FeatureError),
}

/// API credentials, read from the environment by the caller. Absence of a
/// key selects the corresponding synthetic/local strategy.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub news_api_key: Option<String>,
    pub sentiment_api_key: Option<String>,
}

/// Which path produced each input, recorded for provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceModes {
    pub stock_prices: DataSourceMode,
    pub index_prices: DataSourceMode,
    pub news: DataSourceMode,
    pub scorer: String,
}

impl SourceModes {
    /// True when any input was synthesized rather than fetched.
    pub fn any_synthetic(&self) -> bool {
        self.stock_prices.is_synthetic()
            || self.index_prices.is_synthetic()
            || self.news.is_synthetic()
    }
}

/// Everything a run produces, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: RunConfig,
    pub source_modes: SourceModes,
    pub rows: Vec<DailyFeatureRow>,
    pub warnings: Vec<DataQualityWarning>,
    pub correlations: CorrelationReport,
    pub patterns: PatternReport,
    pub classification: Option<ClassificationReport>,
    pub clusters: Option<ClusterReport>,
}

/// Run the full pipeline for a config.
pub fn run_pipeline(
    config: &RunConfig,
    credentials: &Credentials,
) -> Result<PipelineResult, RunnerError> {
    config.validate()?;
    let run_id = config.run_id();
    let seeds = SeedForge::new(config.master_seed);

    info!(
        run_id = %run_id,
        stock = %config.stock_symbol,
        index = %config.index_symbol,
        start = %config.start_date,
        end = %config.end_date,
        offline = config.offline,
        "starting pipeline run"
    );

    // Acquisition. Strategies are fixed at construction; failures degrade
    // to seeded synthetic substitutes inside fetch_or_fallback.
    let market = data::market_provider(config.offline, &seeds);
    let stock = data::fetch_or_fallback(
        market.as_ref(),
        &seeds,
        &config.stock_symbol,
        config.start_date,
        config.end_date,
    );
    let index = data::fetch_or_fallback(
        market.as_ref(),
        &seeds,
        &config.index_symbol,
        config.start_date,
        config.end_date,
    );

    let news_source = news::news_provider(
        credentials.news_api_key.clone(),
        config.offline,
        &seeds,
    );
    let fetched_news = news::fetch_or_fallback(
        news_source.as_ref(),
        &seeds,
        config.issuer(),
        config.start_date,
        config.end_date,
    );

    // Scoring
    let scorer = sentiment::sentiment_scorer(
        credentials.sentiment_api_key.clone(),
        config.offline,
    );
    let records = score_news(&fetched_news.items, scorer.as_ref());
    info!(records = records.len(), scorer = scorer.name(), "scored news items");

    let source_modes = SourceModes {
        stock_prices: stock.mode,
        index_prices: index.mode,
        news: fetched_news.mode,
        scorer: scorer.name().to_string(),
    };

    // Feature construction
    let table = build_features(&stock.bars, &index.bars, &records, config.sentiment_window)?;
    info!(
        rows = table.rows.len(),
        warnings = table.warnings.len(),
        "built feature table"
    );

    // Analysis. Each stochastic pass gets its own derived RNG so results
    // do not depend on pass ordering.
    let correlations = correlation_report(&table.rows);
    let patterns = mine_patterns(&table.rows);

    let mut classify_rng = seeds.rng_for("classify", &config.stock_symbol);
    let classification = classification_report(&table.rows, &mut classify_rng);

    let mut cluster_rng = seeds.rng_for("cluster", &config.stock_symbol);
    let clusters = cluster_report(&table.rows, &mut cluster_rng);

    info!(
        correlations = correlations.pairs.len(),
        rules = patterns.rules.len(),
        classified = classification.is_some(),
        clustered = clusters.is_some(),
        "analysis complete"
    );

    Ok(PipelineResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        config: config.clone(),
        source_modes,
        rows: table.rows,
        warnings: table.warnings,
        correlations,
        patterns,
        classification,
        clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn offline_config() -> RunConfig {
        RunConfig {
            offline: true,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn offline_run_completes_with_synthetic_modes() {
        let result = run_pipeline(&offline_config(), &Credentials::default()).unwrap();

        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert!(result.source_modes.any_synthetic());
        assert_eq!(result.source_modes.stock_prices, DataSourceMode::Synthetic);
        assert_eq!(result.source_modes.index_prices, DataSourceMode::Synthetic);
        assert_eq!(result.source_modes.news, DataSourceMode::Synthetic);
        assert_eq!(result.source_modes.scorer, "lexicon");
        assert!(!result.rows.is_empty());
    }

    #[test]
    fn offline_run_is_fully_deterministic() {
        let config = offline_config();
        let a = run_pipeline(&config, &Credentials::default()).unwrap();
        let b = run_pipeline(&config, &Credentials::default()).unwrap();

        assert_eq!(a.run_id, b.run_id);
        assert_eq!(a.rows, b.rows);
        assert_eq!(
            serde_json::to_string(&a.patterns).unwrap(),
            serde_json::to_string(&b.patterns).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.clusters).unwrap(),
            serde_json::to_string(&b.clusters).unwrap()
        );
    }

    #[test]
    fn different_seed_different_synthetic_data() {
        let config = offline_config();
        let mut other = config.clone();
        other.master_seed = 7;

        let a = run_pipeline(&config, &Credentials::default()).unwrap();
        let b = run_pipeline(&other, &Credentials::default()).unwrap();

        assert_ne!(a.run_id, b.run_id);
        assert_ne!(a.rows, b.rows);
    }

    #[test]
    fn invalid_config_aborts_before_acquisition() {
        let mut config = offline_config();
        config.stock_symbol = String::new();

        let err = run_pipeline(&config, &Credentials::default()).unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
    }

    #[test]
    fn ten_day_synthetic_run_covers_weekdays_only() {
        use chrono::Datelike;

        let config = RunConfig {
            offline: true,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(),
            ..RunConfig::default()
        };
        let result = run_pipeline(&config, &Credentials::default()).unwrap();

        // Jan 3-7 plus Jan 10: six weekdays in the range
        assert_eq!(result.rows.len(), 6);
        for row in &result.rows {
            assert!(row.date.weekday().number_from_monday() <= 5);
            assert!(row.avg_sentiment.is_finite());
        }
    }

    #[test]
    fn half_year_run_produces_analysis() {
        let result = run_pipeline(&offline_config(), &Credentials::default()).unwrap();

        // ~125 business days: plenty for every analysis pass
        assert!(result.rows.len() > 100);
        assert!(!result.correlations.pairs.is_empty());
        assert!(result.patterns.transaction_count > 0);
        assert!(result.classification.is_some());
        assert!(result.clusters.is_some());
    }
}
