//! Synthetic news generator.
//!
//! When no API key is configured (or the real fetch fails), headlines are
//! generated from a fixed sentiment-bearing vocabulary — a mix of positive,
//! negative, and neutral templates mentioning the issuer — distributed
//! across the business days of the range. The mix keeps downstream
//! sentiment analysis non-degenerate, and the seeded RNG keeps runs
//! reproducible.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

use super::provider::{FetchedNews, NewsProvider};
use crate::domain::{DataSourceMode, NewsItem};
use crate::error::DataError;
use crate::seeds::SeedForge;

const POSITIVE_TEMPLATES: &[&str] = &[
    "{issuer} reports strong quarterly results and record profit",
    "{issuer} shares rally after analysts issue buy rating",
    "{issuer} announces strategic partnership to drive growth",
    "{issuer} stock surges on earnings beat",
    "{issuer} wins upgrade as demand hits record high",
];

const NEGATIVE_TEMPLATES: &[&str] = &[
    "{issuer} misses profit expectations, shares plunge",
    "{issuer} faces regulatory investigation over disclosures",
    "{issuer} stock slumps as analysts issue sell rating",
    "{issuer} announces cuts after weak quarterly results",
    "{issuer} hit by lawsuit, outlook downgraded",
];

const NEUTRAL_TEMPLATES: &[&str] = &[
    "{issuer} holds annual general meeting",
    "{issuer} appoints new member to board of directors",
    "{issuer} announces changes to company structure",
    "{issuer} reviews developments in its sector",
    "no major news about {issuer} today",
];

/// Synthetic headline provider, seeded per issuer.
pub struct SyntheticNewsProvider {
    seeds: SeedForge,
}

impl SyntheticNewsProvider {
    pub fn new(seeds: SeedForge) -> Self {
        Self { seeds }
    }
}

impl NewsProvider for SyntheticNewsProvider {
    fn name(&self) -> &str {
        "synthetic_news"
    }

    fn mode(&self) -> DataSourceMode {
        DataSourceMode::Synthetic
    }

    fn fetch(
        &self,
        issuer: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedNews, DataError> {
        let items = generate_headlines(&self.seeds, issuer, start, end);
        Ok(FetchedNews {
            issuer: issuer.to_string(),
            items,
            mode: DataSourceMode::Synthetic,
        })
    }
}

/// Generate 0–3 headlines per business day, drawn uniformly from the
/// combined template vocabulary.
pub fn generate_headlines(
    seeds: &SeedForge,
    issuer: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NewsItem> {
    let templates: Vec<&str> = POSITIVE_TEMPLATES
        .iter()
        .chain(NEGATIVE_TEMPLATES)
        .chain(NEUTRAL_TEMPLATES)
        .copied()
        .collect();

    let mut rng = seeds.rng_for("news", issuer);
    let mut items = Vec::new();
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let count = rng.gen_range(0..=3);
        for _ in 0..count {
            let template = templates[rng.gen_range(0..templates.len())];
            items.push(NewsItem {
                date: current,
                issuer: issuer.to_string(),
                headline: template.replace("{issuer}", issuer),
                source: "synthetic".to_string(),
            });
        }

        current += chrono::Duration::days(1);
    }

    items
}
