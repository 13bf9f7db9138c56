//! Sentiment scoring.
//!
//! Two strategies behind one trait: a remote text-analysis service (used
//! when a credential is configured) and a local finance lexicon. The
//! lexicon path is a pure function of the input text; the remote path is
//! explicitly non-deterministic and mockable through the trait. Neither
//! raises — unscorable input gets a neutral 0.0.

pub mod lexicon;
pub mod remote;

pub use lexicon::LexiconScorer;
pub use remote::RemoteScorer;

use tracing::info;

use crate::domain::{NewsItem, SentimentRecord};

/// A sentiment scorer: text in, score in [-1, 1] out. Never fails.
pub trait SentimentScorer {
    fn name(&self) -> &str;

    fn score(&self, text: &str) -> f64;
}

/// Select the scoring strategy for this run. Decided once at construction.
pub fn sentiment_scorer(api_key: Option<String>, offline: bool) -> Box<dyn SentimentScorer> {
    match api_key {
        Some(key) if !offline => Box::new(RemoteScorer::new(key)),
        _ => {
            info!(scorer = "lexicon", "no sentiment credentials (or offline): using local lexicon");
            Box::new(LexiconScorer::new())
        }
    }
}

/// Score every news item, one SentimentRecord per item.
pub fn score_news(items: &[NewsItem], scorer: &dyn SentimentScorer) -> Vec<SentimentRecord> {
    items
        .iter()
        .map(|item| SentimentRecord {
            date: item.date,
            symbol: item.issuer.clone(),
            score: scorer.score(&item.headline),
            confidence: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn no_key_selects_lexicon() {
        let scorer = sentiment_scorer(None, false);
        assert_eq!(scorer.name(), "lexicon");
    }

    #[test]
    fn key_selects_remote() {
        let scorer = sentiment_scorer(Some("key".into()), false);
        assert_eq!(scorer.name(), "remote");
    }

    #[test]
    fn offline_overrides_key() {
        let scorer = sentiment_scorer(Some("key".into()), true);
        assert_eq!(scorer.name(), "lexicon");
    }

    #[test]
    fn score_news_one_record_per_item() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let items = vec![
            NewsItem {
                date,
                issuer: "THYAO".into(),
                headline: "THYAO shares rally after analysts issue buy rating".into(),
                source: "synthetic".into(),
            },
            NewsItem {
                date,
                issuer: "THYAO".into(),
                headline: "".into(),
                source: "synthetic".into(),
            },
        ];

        let scorer = LexiconScorer::new();
        let records = score_news(&items, &scorer);

        assert_eq!(records.len(), 2);
        assert!(records[0].score > 0.0);
        assert_eq!(records[1].score, 0.0);
        assert!(records.iter().all(|r| (-1.0..=1.0).contains(&r.score)));
    }
}
