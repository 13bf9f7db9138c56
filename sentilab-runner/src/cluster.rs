//! Day-regime clustering.
//!
//! Standardized k-means over the numeric feature columns, with the cluster
//! count chosen by the best mean silhouette score over k = 2..=5. Seeded
//! centroids make the assignment deterministic for a given master seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use sentilab_core::domain::DailyFeatureRow;

/// Columns used as clustering dimensions, in vector order.
pub const CLUSTER_COLUMNS: &[&str] = &[
    "daily_return",
    "index_daily_return",
    "relative_performance",
    "avg_sentiment",
    "sentiment_volatility",
    "news_count",
];

const K_MIN: usize = 2;
const K_MAX: usize = 5;
const MAX_ITERATIONS: usize = 100;

/// One cluster's profile in original (unstandardized) units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub size: usize,
    /// Per-column means, matching [`CLUSTER_COLUMNS`] order.
    pub means: Vec<f64>,
}

/// Results of the clustering pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub k: usize,
    pub silhouette: f64,
    pub profiles: Vec<ClusterProfile>,
    /// Cluster assignment per clustered row, in row order.
    pub assignments: Vec<usize>,
}

/// Rows with any null return column are excluded from clustering.
fn extract_points(rows: &[DailyFeatureRow]) -> Vec<Vec<f64>> {
    rows.iter()
        .filter_map(|row| {
            let ret = row.daily_return?;
            let iret = row.index_daily_return?;
            let rp = row.relative_performance?;
            Some(vec![
                ret,
                iret,
                rp,
                row.avg_sentiment,
                row.sentiment_volatility,
                row.news_count as f64,
            ])
        })
        .collect()
}

fn standardize(points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = points.len() as f64;
    let dim = points[0].len();
    let mut out = points.to_vec();
    for j in 0..dim {
        let mean = points.iter().map(|p| p[j]).sum::<f64>() / n;
        let var = points.iter().map(|p| (p[j] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt().max(f64::EPSILON);
        for p in out.iter_mut() {
            p[j] = (p[j] - mean) / std;
        }
    }
    out
}

fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Lloyd's algorithm with seeded initial centroids drawn from the points.
fn kmeans(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<usize> {
    let dim = points[0].len();

    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.shuffle(rng);
    let mut centroids: Vec<Vec<f64>> =
        indices.iter().take(k).map(|&i| points[i].clone()).collect();

    let mut assignments = vec![0usize; points.len()];
    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, p) in points.iter().enumerate() {
            let nearest = (0..k)
                .min_by(|&a, &b| {
                    distance_sq(p, &centroids[a]).total_cmp(&distance_sq(p, &centroids[b]))
                })
                .unwrap_or(0);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = points
                .iter()
                .zip(&assignments)
                .filter(|(_, &a)| a == c)
                .map(|(p, _)| p)
                .collect();
            if members.is_empty() {
                continue;
            }
            for j in 0..dim {
                centroid[j] = members.iter().map(|p| p[j]).sum::<f64>() / members.len() as f64;
            }
        }
    }

    assignments
}

/// Mean silhouette coefficient over all points. Singleton clusters score 0.
fn silhouette(points: &[Vec<f64>], assignments: &[usize], k: usize) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = assignments[i];
        let own_size = assignments.iter().filter(|&&a| a == own).count();
        if own_size < 2 {
            continue;
        }

        // a(i): mean distance to own cluster, excluding self
        let a = (0..n)
            .filter(|&j| j != i && assignments[j] == own)
            .map(|j| distance_sq(&points[i], &points[j]).sqrt())
            .sum::<f64>()
            / (own_size - 1) as f64;

        // b(i): min over other clusters of mean distance
        let b = (0..k)
            .filter(|&c| c != own)
            .filter_map(|c| {
                let members: Vec<usize> =
                    (0..n).filter(|&j| assignments[j] == c).collect();
                if members.is_empty() {
                    return None;
                }
                Some(
                    members
                        .iter()
                        .map(|&j| distance_sq(&points[i], &points[j]).sqrt())
                        .sum::<f64>()
                        / members.len() as f64,
                )
            })
            .fold(f64::INFINITY, f64::min);

        if b.is_finite() {
            total += (b - a) / a.max(b).max(f64::EPSILON);
        }
    }

    total / n as f64
}

/// Cluster the feature table. k is chosen by the best mean silhouette over
/// 2..=5 (capped at the point count). Returns None when fewer points than
/// the smallest k exist.
pub fn cluster_report(rows: &[DailyFeatureRow], rng: &mut StdRng) -> Option<ClusterReport> {
    let points = extract_points(rows);
    if points.len() <= K_MIN {
        return None;
    }
    let standardized = standardize(&points);

    let k_max = K_MAX.min(points.len() - 1);
    let mut best: Option<(usize, f64, Vec<usize>)> = None;
    for k in K_MIN..=k_max {
        let assignments = kmeans(&standardized, k, rng);
        let score = silhouette(&standardized, &assignments, k);
        if best.as_ref().map_or(true, |(_, s, _)| score > *s) {
            best = Some((k, score, assignments));
        }
    }

    let (k, silhouette, assignments) = best?;

    // Profiles in original units
    let dim = CLUSTER_COLUMNS.len();
    let profiles = (0..k)
        .map(|c| {
            let members: Vec<&Vec<f64>> = points
                .iter()
                .zip(&assignments)
                .filter(|(_, &a)| a == c)
                .map(|(p, _)| p)
                .collect();
            let means = if members.is_empty() {
                vec![0.0; dim]
            } else {
                (0..dim)
                    .map(|j| members.iter().map(|p| p[j]).sum::<f64>() / members.len() as f64)
                    .collect()
            };
            ClusterProfile {
                size: members.len(),
                means,
            }
        })
        .collect();

    Some(ClusterReport {
        k,
        silhouette,
        profiles,
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use sentilab_core::domain::{PerfCategory, SentimentCategory};

    fn row(day_offset: i64, ret: f64, sentiment: f64) -> DailyFeatureRow {
        DailyFeatureRow {
            date: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
                + chrono::Duration::days(day_offset),
            close: 100.0,
            index_close: 1000.0,
            daily_return: Some(ret),
            index_daily_return: Some(0.0),
            relative_performance: Some(ret),
            avg_sentiment: sentiment,
            sentiment_volatility: 0.05,
            news_count: 1,
            perf_category: Some(PerfCategory::from_relative_performance(ret)),
            sentiment_category: SentimentCategory::from_score(sentiment),
        }
    }

    fn two_regimes(n: usize) -> Vec<DailyFeatureRow> {
        // Half the days are calm-positive, half are volatile-negative:
        // two well-separated blobs in feature space.
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    row(i as i64, 0.02, 0.7)
                } else {
                    row(i as i64, -0.04, -0.8)
                }
            })
            .collect()
    }

    #[test]
    fn two_blobs_cluster_as_two() {
        let rows = two_regimes(30);
        let mut rng = StdRng::seed_from_u64(42);
        let report = cluster_report(&rows, &mut rng).unwrap();

        assert_eq!(report.k, 2);
        assert!(report.silhouette > 0.7);
        assert_eq!(report.assignments.len(), 30);

        let sizes: Vec<usize> = report.profiles.iter().map(|p| p.size).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 30);
        assert!(sizes.iter().all(|&s| s == 15));
    }

    #[test]
    fn profiles_report_original_units() {
        let rows = two_regimes(20);
        let mut rng = StdRng::seed_from_u64(42);
        let report = cluster_report(&rows, &mut rng).unwrap();

        // One profile's mean return is near 0.02, the other near -0.04
        let returns: Vec<f64> = report.profiles.iter().map(|p| p.means[0]).collect();
        assert!(returns.iter().any(|&r| (r - 0.02).abs() < 1e-9));
        assert!(returns.iter().any(|&r| (r + 0.04).abs() < 1e-9));
    }

    #[test]
    fn null_return_rows_are_excluded() {
        let mut rows = two_regimes(20);
        rows[0].daily_return = None;
        rows[0].relative_performance = None;

        let mut rng = StdRng::seed_from_u64(42);
        let report = cluster_report(&rows, &mut rng).unwrap();
        assert_eq!(report.assignments.len(), 19);
    }

    #[test]
    fn same_seed_same_assignments() {
        let rows = two_regimes(24);
        let a = cluster_report(&rows, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = cluster_report(&rows, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.k, b.k);
        assert_eq!(a.assignments, b.assignments);
    }

    #[test]
    fn too_few_points_yields_none() {
        let rows = two_regimes(2);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(cluster_report(&rows, &mut rng).is_none());
    }
}
