//! Structured error types for the data layer.
//!
//! Only configuration problems abort a run; everything here is absorbed by
//! a fallback path and reported through logs and data-quality warnings.

use thiserror::Error;

/// Errors from market-data and news acquisition.
///
/// Any of these triggers the synthetic fallback — a single attempt, no
/// retries. The variant is logged so the operator can tell real from
/// synthetic output.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider — treating quota as exhausted for this run")]
    RateLimited,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors from the remote sentiment-scoring service.
///
/// Non-fatal per item: the caller falls back to the local lexicon score.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("sentiment service unreachable: {0}")]
    ServiceUnreachable(String),

    #[error("sentiment service returned no numeric score: {0}")]
    NoScoreInResponse(String),
}

/// A non-fatal quality problem found while building the feature table.
/// The affected row was dropped or imputed; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataQualityWarning(pub String);

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from feature construction. Raised only when the inputs are
/// unusable as a whole (e.g. no valid bars at all), not for single rows.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("no valid price bars for '{symbol}' after validation")]
    NoValidBars { symbol: String },
}
