//! Association-rule mining over the categorical feature columns.
//!
//! Each feature row becomes a transaction of category labels (performance
//! bucket, sentiment bucket). A levelwise apriori pass finds itemsets above
//! minimum support, then rules above minimum confidence, ranked by lift.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use sentilab_core::domain::DailyFeatureRow;

/// Default minimum support for frequent itemsets.
pub const MIN_SUPPORT: f64 = 0.1;

/// Default minimum confidence for rules.
pub const MIN_CONFIDENCE: f64 = 0.5;

/// A frequent itemset with its support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: Vec<String>,
    pub support: f64,
}

/// An association rule `antecedent => consequent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Results of the pattern-mining pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    pub transaction_count: usize,
    pub itemsets: Vec<FrequentItemset>,
    /// Rules above the confidence threshold, sorted by lift descending.
    pub rules: Vec<AssociationRule>,
}

impl PatternReport {
    pub fn avg_confidence(&self) -> f64 {
        if self.rules.is_empty() {
            return 0.0;
        }
        self.rules.iter().map(|r| r.confidence).sum::<f64>() / self.rules.len() as f64
    }

    pub fn avg_lift(&self) -> f64 {
        if self.rules.is_empty() {
            return 0.0;
        }
        self.rules.iter().map(|r| r.lift).sum::<f64>() / self.rules.len() as f64
    }
}

/// Turn feature rows into transactions of category labels. Rows without a
/// performance category (the first row of a table) are skipped.
pub fn transactions(rows: &[DailyFeatureRow]) -> Vec<BTreeSet<String>> {
    rows.iter()
        .filter_map(|row| {
            let perf = row.perf_category?;
            let mut t = BTreeSet::new();
            t.insert(perf.label().to_string());
            t.insert(row.sentiment_category.label().to_string());
            Some(t)
        })
        .collect()
}

/// Mine patterns from the feature table with the default thresholds.
pub fn mine_patterns(rows: &[DailyFeatureRow]) -> PatternReport {
    let txns = transactions(rows);
    mine(&txns, MIN_SUPPORT, MIN_CONFIDENCE)
}

/// Levelwise apriori: frequent itemsets, then rules.
pub fn mine(
    txns: &[BTreeSet<String>],
    min_support: f64,
    min_confidence: f64,
) -> PatternReport {
    let n = txns.len();
    if n == 0 {
        return PatternReport {
            transaction_count: 0,
            itemsets: Vec::new(),
            rules: Vec::new(),
        };
    }

    let support_of = |items: &BTreeSet<String>| -> f64 {
        txns.iter().filter(|t| items.is_subset(t)).count() as f64 / n as f64
    };

    // Level 1: frequent single items
    let mut alphabet: BTreeSet<String> = BTreeSet::new();
    for t in txns {
        alphabet.extend(t.iter().cloned());
    }

    let mut frequent: Vec<BTreeSet<String>> = Vec::new();
    let mut level: Vec<BTreeSet<String>> = alphabet
        .iter()
        .map(|item| BTreeSet::from([item.clone()]))
        .filter(|set| support_of(set) >= min_support)
        .collect();

    // Levelwise expansion: candidates are unions of frequent sets from the
    // previous level that differ by exactly one item.
    while !level.is_empty() {
        frequent.extend(level.iter().cloned());

        let mut candidates: BTreeSet<BTreeSet<String>> = BTreeSet::new();
        for (i, a) in level.iter().enumerate() {
            for b in &level[i + 1..] {
                let union: BTreeSet<String> = a.union(b).cloned().collect();
                if union.len() == a.len() + 1 {
                    candidates.insert(union);
                }
            }
        }

        level = candidates
            .into_iter()
            .filter(|set| support_of(set) >= min_support)
            .collect();
    }

    let mut support_cache: HashMap<Vec<String>, f64> = HashMap::new();
    for set in &frequent {
        let key: Vec<String> = set.iter().cloned().collect();
        support_cache.insert(key, support_of(set));
    }

    // Rules from itemsets of size >= 2: every non-empty proper subset is a
    // candidate antecedent.
    let mut rules = Vec::new();
    for set in frequent.iter().filter(|s| s.len() >= 2) {
        let set_support = support_of(set);
        let items: Vec<String> = set.iter().cloned().collect();

        for mask in 1..(1u32 << items.len()) - 1 {
            let antecedent: BTreeSet<String> = items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| s.clone())
                .collect();
            let consequent: BTreeSet<String> = set.difference(&antecedent).cloned().collect();

            let ant_support = support_of(&antecedent);
            let con_support = support_of(&consequent);
            if ant_support == 0.0 || con_support == 0.0 {
                continue;
            }

            let confidence = set_support / ant_support;
            if confidence < min_confidence {
                continue;
            }

            rules.push(AssociationRule {
                antecedent: antecedent.into_iter().collect(),
                consequent: consequent.into_iter().collect(),
                support: set_support,
                confidence,
                lift: confidence / con_support,
            });
        }
    }

    rules.sort_by(|a, b| b.lift.total_cmp(&a.lift));

    let itemsets = frequent
        .into_iter()
        .map(|set| {
            let key: Vec<String> = set.iter().cloned().collect();
            let support = support_cache[&key];
            FrequentItemset {
                items: key,
                support,
            }
        })
        .collect();

    PatternReport {
        transaction_count: n,
        itemsets,
        rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_transactions_empty_report() {
        let report = mine(&[], 0.1, 0.5);
        assert_eq!(report.transaction_count, 0);
        assert!(report.rules.is_empty());
    }

    #[test]
    fn support_and_confidence_on_hand_built_set() {
        // 10 transactions: positive news co-occurs with outperform 4 times,
        // appears alone twice; outperform appears 5 times total.
        let mut txns = Vec::new();
        for _ in 0..4 {
            txns.push(txn(&["positive_news", "outperform"]));
        }
        for _ in 0..2 {
            txns.push(txn(&["positive_news", "neutral_perf"]));
        }
        txns.push(txn(&["negative_news", "outperform"]));
        for _ in 0..3 {
            txns.push(txn(&["negative_news", "underperform"]));
        }

        let report = mine(&txns, 0.1, 0.5);

        let rule = report
            .rules
            .iter()
            .find(|r| r.antecedent == vec!["positive_news"] && r.consequent == vec!["outperform"])
            .expect("expected positive_news => outperform rule");

        assert!((rule.support - 0.4).abs() < 1e-12);
        assert!((rule.confidence - 4.0 / 6.0).abs() < 1e-12);
        // lift = confidence / support(outperform) = (4/6) / (5/10)
        assert!((rule.lift - (4.0 / 6.0) / 0.5).abs() < 1e-12);
    }

    #[test]
    fn low_support_itemsets_are_pruned() {
        let mut txns = vec![txn(&["a", "b"]); 19];
        txns.push(txn(&["rare"]));

        let report = mine(&txns, 0.1, 0.5);
        assert!(!report
            .itemsets
            .iter()
            .any(|s| s.items.contains(&"rare".to_string())));
    }

    #[test]
    fn rules_sorted_by_lift_descending() {
        let mut txns = Vec::new();
        for _ in 0..5 {
            txns.push(txn(&["a", "b"]));
        }
        for _ in 0..5 {
            txns.push(txn(&["c", "d"]));
        }
        let report = mine(&txns, 0.1, 0.5);
        for pair in report.rules.windows(2) {
            assert!(pair[0].lift >= pair[1].lift);
        }
    }

    #[test]
    fn transactions_skip_rows_without_perf_category() {
        use chrono::NaiveDate;
        use sentilab_core::domain::{DailyFeatureRow, PerfCategory, SentimentCategory};

        let mut rows = Vec::new();
        for day in 1..=3 {
            rows.push(DailyFeatureRow {
                date: NaiveDate::from_ymd_opt(2022, 1, day).unwrap(),
                close: 100.0,
                index_close: 1000.0,
                daily_return: if day == 1 { None } else { Some(0.02) },
                index_daily_return: if day == 1 { None } else { Some(0.0) },
                relative_performance: if day == 1 { None } else { Some(0.02) },
                avg_sentiment: 0.5,
                sentiment_volatility: 0.0,
                news_count: 1,
                perf_category: if day == 1 {
                    None
                } else {
                    Some(PerfCategory::Outperform)
                },
                sentiment_category: SentimentCategory::Positive,
            });
        }

        let txns = transactions(&rows);
        assert_eq!(txns.len(), 2);
    }
}
