//! Local lexicon-based sentiment scorer.
//!
//! A finance-tuned keyword lexicon: each matched phrase contributes its
//! weight, and the score is the mean weight of the matched phrases, clamped
//! to [-1, 1]. Pure function of the input text — no hidden randomness — so
//! fully-synthetic runs are reproducible.

use super::SentimentScorer;

/// Favorable phrases and their weights.
const POSITIVE_PHRASES: &[(&str, f64)] = &[
    ("surge", 0.5),
    ("rally", 0.5),
    ("soar", 0.6),
    ("record profit", 0.6),
    ("record high", 0.5),
    ("strong", 0.4),
    ("beat", 0.4),
    ("buy rating", 0.5),
    ("upgrade", 0.4),
    ("partnership", 0.3),
    ("growth", 0.3),
    ("gain", 0.3),
    ("profit", 0.2),
    ("expansion", 0.3),
    ("breakthrough", 0.5),
    ("outperform", 0.4),
    ("dividend", 0.2),
];

/// Unfavorable phrases and their weights.
const NEGATIVE_PHRASES: &[(&str, f64)] = &[
    ("plunge", -0.6),
    ("slump", -0.5),
    ("crash", -0.6),
    ("miss", -0.4),
    ("misses", -0.4),
    ("sell rating", -0.5),
    ("downgrade", -0.4),
    ("lawsuit", -0.5),
    ("investigation", -0.4),
    ("fraud", -0.6),
    ("weak", -0.4),
    ("loss", -0.4),
    ("cuts", -0.3),
    ("decline", -0.3),
    ("bankrupt", -0.8),
    ("underperform", -0.4),
    ("scandal", -0.6),
];

/// Pure lexicon scorer.
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        if lower.trim().is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut hits = 0usize;

        for &(phrase, weight) in POSITIVE_PHRASES.iter().chain(NEGATIVE_PHRASES) {
            if lower.contains(phrase) {
                total += weight;
                hits += 1;
            }
        }

        if hits == 0 {
            return 0.0;
        }

        (total / hits as f64).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_headline_scores_positive() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("THYAO shares rally after strong earnings beat") > 0.0);
    }

    #[test]
    fn negative_headline_scores_negative() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("THYAO misses profit expectations, shares plunge") < 0.0);
    }

    #[test]
    fn neutral_headline_scores_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("THYAO holds annual general meeting"), 0.0);
    }

    #[test]
    fn empty_string_scores_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("   "), 0.0);
    }

    #[test]
    fn case_insensitive() {
        let scorer = LexiconScorer::new();
        assert_eq!(
            scorer.score("Shares RALLY on STRONG results"),
            scorer.score("shares rally on strong results")
        );
    }

    proptest! {
        /// Purity: identical input always yields an identical, in-range score.
        #[test]
        fn score_is_pure_and_bounded(text in ".{0,200}") {
            let scorer = LexiconScorer::new();
            let a = scorer.score(&text);
            let b = scorer.score(&text);
            prop_assert_eq!(a, b);
            prop_assert!((-1.0..=1.0).contains(&a));
        }
    }
}
