//! Market-data provider trait.
//!
//! The MarketDataProvider trait abstracts over price-bar sources (Yahoo
//! Finance, the synthetic random walk) so the pipeline can swap
//! implementations and mock for tests. Which implementation runs is decided
//! once, at construction time — not re-checked per call.

use chrono::NaiveDate;

use crate::domain::{DataSourceMode, PriceBar};
use crate::error::DataError;

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchedBars {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub mode: DataSourceMode,
}

/// Trait for daily price-bar providers.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Whether this provider returns real or synthetic data.
    fn mode(&self) -> DataSourceMode;

    /// Fetch daily bars for a symbol over an inclusive date range.
    ///
    /// A single attempt: implementations must not retry. Failure is the
    /// caller's cue to substitute synthetic data.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedBars, DataError>;
}
