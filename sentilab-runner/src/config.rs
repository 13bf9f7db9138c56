//! Serializable run configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a pipeline run (content-addressable hash).
pub type RunId = String;

/// Configuration problems are the only fatal errors in the pipeline:
/// they abort before any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("stock symbol must not be empty")]
    EmptyStockSymbol,

    #[error("index symbol must not be empty")]
    EmptyIndexSymbol,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("sentiment window must be at least 1 day")]
    ZeroSentimentWindow,
}

/// All parameters needed to reproduce a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Stock symbol under analysis (e.g. "THYAO.IS").
    pub stock_symbol: String,

    /// Benchmark index symbol (e.g. "XU100.IS").
    pub index_symbol: String,

    /// Analysis start date (inclusive).
    pub start_date: NaiveDate,

    /// Analysis end date (inclusive).
    pub end_date: NaiveDate,

    /// Master seed for all synthetic data and stochastic analysis.
    pub master_seed: u64,

    /// Trailing window (trading days) for sentiment volatility.
    pub sentiment_window: usize,

    /// Skip real providers even when credentials are configured.
    pub offline: bool,
}

impl RunConfig {
    /// Validate before any acquisition work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stock_symbol.trim().is_empty() {
            return Err(ConfigError::EmptyStockSymbol);
        }
        if self.index_symbol.trim().is_empty() {
            return Err(ConfigError::EmptyIndexSymbol);
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.sentiment_window == 0 {
            return Err(ConfigError::ZeroSentimentWindow);
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration. Two runs with
    /// identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }

    /// Issuer name used for news queries: the symbol minus any exchange
    /// suffix ("THYAO.IS" → "THYAO").
    pub fn issuer(&self) -> &str {
        self.stock_symbol
            .split('.')
            .next()
            .unwrap_or(&self.stock_symbol)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stock_symbol: "THYAO.IS".into(),
            index_symbol: "XU100.IS".into(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            master_seed: 42,
            sentiment_window: 5,
            offline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_symbol_rejected() {
        let mut config = RunConfig::default();
        config.stock_symbol = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyStockSymbol)
        ));
    }

    #[test]
    fn reversed_date_range_rejected() {
        let mut config = RunConfig::default();
        config.start_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        config.end_date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn run_id_deterministic_and_param_sensitive() {
        let config = RunConfig::default();
        assert_eq!(config.run_id(), config.run_id());

        let mut other = config.clone();
        other.master_seed = 43;
        assert_ne!(config.run_id(), other.run_id());
    }

    #[test]
    fn issuer_strips_exchange_suffix() {
        let config = RunConfig::default();
        assert_eq!(config.issuer(), "THYAO");

        let mut bare = config.clone();
        bare.stock_symbol = "AAPL".into();
        assert_eq!(bare.issuer(), "AAPL");
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = RunConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
