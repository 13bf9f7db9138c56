//! SentiLab Runner — pipeline orchestration, analysis, artifact export.
//!
//! This crate builds on `sentilab-core` to provide:
//! - Run configuration with validation and content-hashed run ids
//! - The end-to-end pipeline (acquisition, scoring, features, analysis)
//! - Exploratory correlations with significance tests
//! - Association-rule mining over the category columns
//! - Seeded random-forest classification and k-means day regimes
//! - JSON/CSV artifact export and the Markdown report

pub mod classify;
pub mod cluster;
pub mod config;
pub mod export;
pub mod patterns;
pub mod report;
pub mod runner;
pub mod stats;

pub use classify::{classification_report, ClassificationReport};
pub use cluster::{cluster_report, ClusterProfile, ClusterReport};
pub use config::{ConfigError, RunConfig, RunId};
pub use export::{
    export_chart_prices_csv, export_chart_sentiment_csv, export_features_csv, export_json,
    import_json, load_artifacts, save_artifacts,
};
pub use patterns::{mine_patterns, AssociationRule, FrequentItemset, PatternReport};
pub use report::generate_report;
pub use runner::{run_pipeline, Credentials, PipelineResult, RunnerError, SourceModes, SCHEMA_VERSION};
pub use stats::{correlation_report, strongest, Correlation, CorrelationReport};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn run_config_is_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
    }

    #[test]
    fn pipeline_result_is_send_sync() {
        assert_send::<PipelineResult>();
        assert_sync::<PipelineResult>();
    }

    #[test]
    fn analysis_types_are_send_sync() {
        assert_send::<CorrelationReport>();
        assert_sync::<CorrelationReport>();
        assert_send::<PatternReport>();
        assert_sync::<PatternReport>();
        assert_send::<ClassificationReport>();
        assert_sync::<ClassificationReport>();
        assert_send::<ClusterReport>();
        assert_sync::<ClusterReport>();
    }
}
