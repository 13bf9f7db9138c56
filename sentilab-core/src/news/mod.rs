//! News acquisition with graceful degradation.
//!
//! Strategy selection happens once at construction: a configured API key
//! selects the NewsAPI client, its absence selects the synthetic generator.
//! A failed real fetch is answered with synthetic headlines for the same
//! range, logged at warning level.

pub mod newsapi;
pub mod provider;
pub mod synthetic;

pub use newsapi::NewsApiProvider;
pub use provider::{FetchedNews, NewsProvider};
pub use synthetic::SyntheticNewsProvider;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::seeds::SeedForge;

/// Select the news strategy for this run.
///
/// `api_key` present and not forced offline → real NewsAPI client;
/// otherwise the synthetic generator. Decided once, never re-checked.
pub fn news_provider(
    api_key: Option<String>,
    offline: bool,
    seeds: &SeedForge,
) -> Box<dyn NewsProvider> {
    match api_key {
        Some(key) if !offline => Box::new(NewsApiProvider::new(key)),
        _ => {
            info!(
                provider = "synthetic_news",
                "no news credentials (or offline): using synthetic headlines"
            );
            Box::new(SyntheticNewsProvider::new(seeds.clone()))
        }
    }
}

/// Fetch news for an issuer, substituting synthetic headlines on failure.
pub fn fetch_or_fallback(
    provider: &dyn NewsProvider,
    seeds: &SeedForge,
    issuer: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> FetchedNews {
    match provider.fetch(issuer, start, end) {
        Ok(fetched) => {
            info!(
                issuer,
                items = fetched.items.len(),
                provider = provider.name(),
                mode = %fetched.mode,
                "fetched news items"
            );
            fetched
        }
        Err(e) => {
            warn!(
                issuer,
                provider = provider.name(),
                error = %e,
                "news fetch failed — substituting synthetic headlines"
            );
            let synth = SyntheticNewsProvider::new(seeds.clone());
            synth
                .fetch(issuer, start, end)
                .expect("synthetic provider is infallible")
        }
    }
}
