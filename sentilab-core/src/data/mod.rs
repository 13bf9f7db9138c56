//! Market-data acquisition with graceful degradation.
//!
//! The provider strategy is chosen once, at construction time: online runs
//! get the Yahoo provider, offline runs get the synthetic walk. When the
//! real provider fails, the same synthetic generator substitutes a
//! schema-identical series for the requested range — silent to downstream
//! consumers, loud in the logs.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{FetchedBars, MarketDataProvider};
pub use synthetic::SyntheticMarketProvider;
pub use yahoo::YahooProvider;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::seeds::SeedForge;

/// Select the market-data strategy for this run.
///
/// `offline` forces the synthetic provider. The decision is made here,
/// once; callers never re-check capabilities per fetch.
pub fn market_provider(offline: bool, seeds: &SeedForge) -> Box<dyn MarketDataProvider> {
    if offline {
        info!(provider = "synthetic_walk", "offline mode: using synthetic market data");
        Box::new(SyntheticMarketProvider::new(seeds.clone()))
    } else {
        Box::new(YahooProvider::new())
    }
}

/// Fetch bars for a symbol, substituting a synthetic series on failure.
///
/// A single attempt against the configured provider; any error is logged at
/// warning level and answered with the seeded random walk for the same
/// range. The returned `mode` records which path produced the data.
pub fn fetch_or_fallback(
    provider: &dyn MarketDataProvider,
    seeds: &SeedForge,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> FetchedBars {
    match provider.fetch(symbol, start, end) {
        Ok(fetched) => {
            info!(
                symbol,
                bars = fetched.bars.len(),
                provider = provider.name(),
                mode = %fetched.mode,
                "fetched price bars"
            );
            fetched
        }
        Err(e) => {
            warn!(
                symbol,
                provider = provider.name(),
                error = %e,
                "market data fetch failed — substituting synthetic series"
            );
            let synth = SyntheticMarketProvider::new(seeds.clone());
            synth
                .fetch(symbol, start, end)
                .expect("synthetic provider is infallible")
        }
    }
}
