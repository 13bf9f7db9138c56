//! Relative-performance classification.
//!
//! A seeded random forest (bootstrap-sampled CART trees with per-split
//! feature subsets) predicts the daily performance bucket from the numeric
//! features and their one-day lags. Everything is deterministic given the
//! master seed; evaluation reports accuracy, a confusion matrix, and
//! mean-decrease-impurity feature importance.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use sentilab_core::domain::{DailyFeatureRow, PerfCategory};

/// Feature columns fed to the forest, in vector order.
pub const FEATURE_NAMES: &[&str] = &[
    "close",
    "daily_return",
    "index_daily_return",
    "avg_sentiment",
    "sentiment_volatility",
    "news_count",
    "close_lag1",
    "daily_return_lag1",
    "index_daily_return_lag1",
    "relative_performance_lag1",
    "avg_sentiment_lag1",
];

const CLASS_COUNT: usize = 3;
const TREE_COUNT: usize = 50;
const MAX_DEPTH: usize = 8;
const MIN_SAMPLES_SPLIT: usize = 4;
const TEST_FRACTION: f64 = 0.3;

fn class_index(c: PerfCategory) -> usize {
    match c {
        PerfCategory::Underperform => 0,
        PerfCategory::Neutral => 1,
        PerfCategory::Outperform => 2,
    }
}

fn class_label(i: usize) -> &'static str {
    match i {
        0 => "underperform",
        1 => "neutral_perf",
        _ => "outperform",
    }
}

/// Supervised dataset extracted from the feature table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
}

/// Results of the classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    /// Accuracy of always predicting the most common training class.
    pub baseline_accuracy: f64,
    /// confusion[actual][predicted], class order: underperform, neutral, outperform.
    pub confusion: [[usize; CLASS_COUNT]; CLASS_COUNT],
    pub class_labels: Vec<String>,
    /// (feature name, normalized importance), sorted descending.
    pub feature_importance: Vec<(String, f64)>,
}

/// Extract the supervised dataset: one sample per row with a performance
/// category and a full set of lagged values (the first two rows are skipped).
pub fn extract_dataset(rows: &[DailyFeatureRow]) -> Dataset {
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for i in 1..rows.len() {
        let row = &rows[i];
        let lag = &rows[i - 1];

        let (Some(ret), Some(iret), Some(target)) =
            (row.daily_return, row.index_daily_return, row.perf_category)
        else {
            continue;
        };
        let (Some(lag_ret), Some(lag_iret), Some(lag_rp)) =
            (lag.daily_return, lag.index_daily_return, lag.relative_performance)
        else {
            continue;
        };

        features.push(vec![
            row.close,
            ret,
            iret,
            row.avg_sentiment,
            row.sentiment_volatility,
            row.news_count as f64,
            lag.close,
            lag_ret,
            lag_iret,
            lag_rp,
            lag.avg_sentiment,
        ]);
        labels.push(class_index(target));
    }

    Dataset { features, labels }
}

/// Standardize columns in place using the training rows' mean and std.
fn standardize(train: &mut [Vec<f64>], test: &mut [Vec<f64>]) {
    if train.is_empty() {
        return;
    }
    let dim = train[0].len();
    for j in 0..dim {
        let n = train.len() as f64;
        let mean = train.iter().map(|r| r[j]).sum::<f64>() / n;
        let var = train.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt().max(f64::EPSILON);
        for r in train.iter_mut() {
            r[j] = (r[j] - mean) / std;
        }
        for r in test.iter_mut() {
            r[j] = (r[j] - mean) / std;
        }
    }
}

// ─── CART tree ──────────────────────────────────────────────────────

enum Node {
    Leaf {
        label: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

fn gini(counts: &[usize; CLASS_COUNT]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

fn class_counts(labels: &[usize], indices: &[usize]) -> [usize; CLASS_COUNT] {
    let mut counts = [0usize; CLASS_COUNT];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

fn majority(counts: &[usize; CLASS_COUNT]) -> usize {
    counts
        .iter()
        .enumerate()
        .max_by_key(|(_, &c)| c)
        .map(|(i, _)| i)
        .unwrap_or(1)
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    labels: &'a [usize],
    features_per_split: usize,
    total_samples: f64,
    /// Accumulated impurity decrease per feature.
    importance: Vec<f64>,
}

impl<'a> TreeBuilder<'a> {
    fn build(&mut self, indices: &[usize], depth: usize, rng: &mut StdRng) -> Node {
        let counts = class_counts(self.labels, indices);
        let node_gini = gini(&counts);

        if depth >= MAX_DEPTH
            || indices.len() < MIN_SAMPLES_SPLIT
            || node_gini == 0.0
        {
            return Node::Leaf {
                label: majority(&counts),
            };
        }

        let dim = self.features[0].len();
        let mut candidates: Vec<usize> = (0..dim).collect();
        candidates.shuffle(rng);
        candidates.truncate(self.features_per_split);

        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, weighted gini)
        for &feat in &candidates {
            let mut values: Vec<f64> = indices.iter().map(|&i| self.features[i][feat]).collect();
            values.sort_by(f64::total_cmp);
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let (mut lc, mut rc) = ([0usize; CLASS_COUNT], [0usize; CLASS_COUNT]);
                for &i in indices {
                    if self.features[i][feat] <= threshold {
                        lc[self.labels[i]] += 1;
                    } else {
                        rc[self.labels[i]] += 1;
                    }
                }
                let ln: usize = lc.iter().sum();
                let rn: usize = rc.iter().sum();
                if ln == 0 || rn == 0 {
                    continue;
                }
                let weighted = (ln as f64 * gini(&lc) + rn as f64 * gini(&rc))
                    / indices.len() as f64;
                if best.map_or(true, |(_, _, g)| weighted < g) {
                    best = Some((feat, threshold, weighted));
                }
            }
        }

        let Some((feature, threshold, weighted)) = best else {
            return Node::Leaf {
                label: majority(&counts),
            };
        };

        // Mean-decrease-impurity contribution, weighted by node size
        self.importance[feature] +=
            (indices.len() as f64 / self.total_samples) * (node_gini - weighted);

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.features[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(&left_idx, depth + 1, rng)),
            right: Box::new(self.build(&right_idx, depth + 1, rng)),
        }
    }
}

fn predict_tree(node: &Node, sample: &[f64]) -> usize {
    match node {
        Node::Leaf { label } => *label,
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if sample[*feature] <= *threshold {
                predict_tree(left, sample)
            } else {
                predict_tree(right, sample)
            }
        }
    }
}

/// A trained forest plus its accumulated feature importance.
pub struct Forest {
    trees: Vec<Node>,
    importance: Vec<f64>,
}

impl Forest {
    /// Train on the given samples with a seeded RNG.
    pub fn train(features: &[Vec<f64>], labels: &[usize], rng: &mut StdRng) -> Self {
        let n = features.len();
        let dim = features[0].len();
        let features_per_split = (dim as f64).sqrt().ceil() as usize;

        let mut trees = Vec::with_capacity(TREE_COUNT);
        let mut importance = vec![0.0; dim];

        for _ in 0..TREE_COUNT {
            // Bootstrap sample with replacement
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut builder = TreeBuilder {
                features,
                labels,
                features_per_split,
                total_samples: n as f64,
                importance: vec![0.0; dim],
            };
            let tree = builder.build(&indices, 0, rng);
            for (acc, inc) in importance.iter_mut().zip(&builder.importance) {
                *acc += inc;
            }
            trees.push(tree);
        }

        Forest { trees, importance }
    }

    /// Majority vote over the trees.
    pub fn predict(&self, sample: &[f64]) -> usize {
        let mut votes = [0usize; CLASS_COUNT];
        for tree in &self.trees {
            votes[predict_tree(tree, sample)] += 1;
        }
        majority(&votes)
    }
}

/// Run the full classification pass: extract, split 70/30, standardize,
/// train, evaluate. Returns None when too few labelled samples exist.
pub fn classification_report(
    rows: &[DailyFeatureRow],
    rng: &mut StdRng,
) -> Option<ClassificationReport> {
    let dataset = extract_dataset(rows);
    let n = dataset.features.len();
    if n < 10 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let test_size = ((n as f64) * TEST_FRACTION).round() as usize;
    let (test_idx, train_idx) = order.split_at(test_size.clamp(1, n - 1));

    let mut train: Vec<Vec<f64>> = train_idx.iter().map(|&i| dataset.features[i].clone()).collect();
    let train_labels: Vec<usize> = train_idx.iter().map(|&i| dataset.labels[i]).collect();
    let mut test: Vec<Vec<f64>> = test_idx.iter().map(|&i| dataset.features[i].clone()).collect();
    let test_labels: Vec<usize> = test_idx.iter().map(|&i| dataset.labels[i]).collect();

    standardize(&mut train, &mut test);

    let forest = Forest::train(&train, &train_labels, rng);

    let mut confusion = [[0usize; CLASS_COUNT]; CLASS_COUNT];
    let mut correct = 0usize;
    for (sample, &actual) in test.iter().zip(&test_labels) {
        let predicted = forest.predict(sample);
        confusion[actual][predicted] += 1;
        if predicted == actual {
            correct += 1;
        }
    }
    let accuracy = correct as f64 / test.len() as f64;

    // Baseline: always predict the most common training class
    let mut train_counts = [0usize; CLASS_COUNT];
    for &l in &train_labels {
        train_counts[l] += 1;
    }
    let majority_class = majority(&train_counts);
    let baseline_accuracy = test_labels
        .iter()
        .filter(|&&l| l == majority_class)
        .count() as f64
        / test.len() as f64;

    let total_importance: f64 = forest.importance.iter().sum();
    let mut feature_importance: Vec<(String, f64)> = FEATURE_NAMES
        .iter()
        .zip(&forest.importance)
        .map(|(name, &imp)| {
            let normalized = if total_importance > 0.0 {
                imp / total_importance
            } else {
                0.0
            };
            (name.to_string(), normalized)
        })
        .collect();
    feature_importance.sort_by(|a, b| b.1.total_cmp(&a.1));

    Some(ClassificationReport {
        train_size: train.len(),
        test_size: test.len(),
        accuracy,
        baseline_accuracy,
        confusion,
        class_labels: (0..CLASS_COUNT).map(|i| class_label(i).to_string()).collect(),
        feature_importance,
    })
}
