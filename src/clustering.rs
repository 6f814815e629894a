//! Minimal seeded k-means over the student feature space.
//!
//! Only `k <= 3` and three features are ever needed, so this stays a small
//! Lloyd's-algorithm implementation instead of pulling in a scientific
//! computing stack:
//! - features standardized to zero mean / unit variance (population stats)
//! - farthest-point initialization, first pick drawn from a fixed-seed
//!   ChaCha8 RNG
//! - squared Euclidean distance, iteration cap, empty-cluster reseeding
//!
//! Identical input and seed always produce identical assignments.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::ClusteringConfig;

/// avg_score, total_attempts, avg_time.
pub const FEATURE_DIM: usize = 3;

const EPSILON: f64 = 1e-10;

/// Per-feature population statistics, kept so centroids can be mapped back
/// to the original scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster index per input point, parallel to the input slice.
    pub assignments: Vec<usize>,
    pub centroids: Vec<[f64; FEATURE_DIM]>,
}

/// Scale each feature to zero mean / unit variance. A feature with zero
/// variance standardizes to 0 everywhere rather than dividing by zero.
pub fn standardize(
    points: &[[f64; FEATURE_DIM]],
) -> (Vec<[f64; FEATURE_DIM]>, [FeatureStats; FEATURE_DIM]) {
    let n = points.len().max(1) as f64;

    let mut stats = [FeatureStats {
        mean: 0.0,
        std_dev: 0.0,
    }; FEATURE_DIM];

    for d in 0..FEATURE_DIM {
        let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
        let variance = points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n;
        stats[d] = FeatureStats {
            mean,
            std_dev: variance.sqrt(),
        };
    }

    let scaled = points
        .iter()
        .map(|p| {
            let mut row = [0.0; FEATURE_DIM];
            for d in 0..FEATURE_DIM {
                row[d] = if stats[d].std_dev > EPSILON {
                    (p[d] - stats[d].mean) / stats[d].std_dev
                } else {
                    0.0
                };
            }
            row
        })
        .collect();

    (scaled, stats)
}

/// Map a centroid in standardized space back to the original feature scale.
pub fn destandardize(
    centroid: &[f64; FEATURE_DIM],
    stats: &[FeatureStats; FEATURE_DIM],
) -> [f64; FEATURE_DIM] {
    let mut row = [0.0; FEATURE_DIM];
    for d in 0..FEATURE_DIM {
        row[d] = centroid[d] * stats[d].std_dev + stats[d].mean;
    }
    row
}

pub fn squared_distance(a: &[f64; FEATURE_DIM], b: &[f64; FEATURE_DIM]) -> f64 {
    let mut sum = 0.0;
    for d in 0..FEATURE_DIM {
        let diff = a[d] - b[d];
        sum += diff * diff;
    }
    sum
}

/// Lloyd's algorithm with seeded farthest-point initialization.
///
/// `k` is clamped to `1..=points.len()`. Converges when assignments stop
/// changing or the iteration cap is hit.
pub fn kmeans(points: &[[f64; FEATURE_DIM]], k: usize, config: &ClusteringConfig) -> KMeansResult {
    assert!(!points.is_empty(), "kmeans requires at least one point");
    let k = k.clamp(1, points.len());

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut centroids = init_centroids(points, k, &mut rng);
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..config.max_iterations {
        let next: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();

        let converged = next == assignments;
        assignments = next;

        recompute_centroids(points, &assignments, &mut centroids);
        fill_empty_clusters(points, &mut assignments, &mut centroids);

        if converged {
            break;
        }
    }

    KMeansResult {
        assignments,
        centroids,
    }
}

/// Farthest-point initialization: first centroid drawn from the seeded RNG,
/// each subsequent one is the point with the greatest squared distance to its
/// nearest already-chosen centroid. Spreads the initial centroids across
/// separated groups without any further randomness.
fn init_centroids(
    points: &[[f64; FEATURE_DIM]],
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<[f64; FEATURE_DIM]> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)]);

    let mut min_distances = vec![f64::MAX; n];
    while centroids.len() < k {
        let last = centroids.last().expect("at least one centroid");
        for (i, point) in points.iter().enumerate() {
            let dist = squared_distance(point, last);
            if dist < min_distances[i] {
                min_distances[i] = dist;
            }
        }

        // Ties keep the lowest index; when every remaining point coincides
        // with a chosen centroid this duplicates one, and the empty-cluster
        // pass later hands it a member.
        let mut next = 0;
        let mut best = -1.0;
        for (i, &dist) in min_distances.iter().enumerate() {
            if dist > best {
                best = dist;
                next = i;
            }
        }
        centroids.push(points[next]);
    }

    centroids
}

/// Ties go to the lowest cluster index, keeping assignment deterministic.
fn nearest_centroid(point: &[f64; FEATURE_DIM], centroids: &[[f64; FEATURE_DIM]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best = idx;
            best_dist = dist;
        }
    }
    best
}

fn recompute_centroids(
    points: &[[f64; FEATURE_DIM]],
    assignments: &[usize],
    centroids: &mut [[f64; FEATURE_DIM]],
) {
    let k = centroids.len();
    let mut sums = vec![[0.0; FEATURE_DIM]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for d in 0..FEATURE_DIM {
            sums[cluster][d] += point[d];
        }
    }

    for (cluster, centroid) in centroids.iter_mut().enumerate() {
        if counts[cluster] == 0 {
            continue; // handled by fill_empty_clusters
        }
        for d in 0..FEATURE_DIM {
            centroid[d] = sums[cluster][d] / counts[cluster] as f64;
        }
    }
}

/// Reseed any empty cluster to the point farthest from its current centroid
/// and move that point over, so every label stays in use.
fn fill_empty_clusters(
    points: &[[f64; FEATURE_DIM]],
    assignments: &mut [usize],
    centroids: &mut [[f64; FEATURE_DIM]],
) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &cluster in assignments.iter() {
        counts[cluster] += 1;
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }

        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[assignments[*i]] > 1)
            .map(|(i, p)| (i, squared_distance(p, &centroids[assignments[i]])))
            .fold(None, |best: Option<(usize, f64)>, (i, dist)| match best {
                Some((_, best_dist)) if best_dist >= dist => best,
                _ => Some((i, dist)),
            });

        if let Some((idx, _)) = farthest {
            counts[assignments[idx]] -= 1;
            assignments[idx] = cluster;
            counts[cluster] = 1;
            centroids[cluster] = points[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClusteringConfig {
        ClusteringConfig::default()
    }

    #[test]
    fn test_standardize_zero_mean_unit_variance() {
        let points = vec![[10.0, 1.0, 30.0], [20.0, 3.0, 60.0], [30.0, 5.0, 90.0]];
        let (scaled, stats) = standardize(&points);

        for d in 0..FEATURE_DIM {
            let mean: f64 = scaled.iter().map(|p| p[d]).sum::<f64>() / 3.0;
            let var: f64 = scaled.iter().map(|p| p[d].powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
        assert!((stats[0].mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_standardize_constant_feature() {
        let points = vec![[5.0, 1.0, 60.0], [5.0, 2.0, 60.0], [5.0, 3.0, 60.0]];
        let (scaled, stats) = standardize(&points);
        for p in &scaled {
            assert_eq!(p[0], 0.0);
            assert_eq!(p[2], 0.0);
        }
        assert_eq!(stats[0].std_dev, 0.0);
    }

    #[test]
    fn test_destandardize_recovers_scale() {
        let points = vec![[10.0, 2.0, 30.0], [50.0, 4.0, 90.0], [90.0, 6.0, 50.0]];
        let (scaled, stats) = standardize(&points);
        for (orig, z) in points.iter().zip(scaled.iter()) {
            let back = destandardize(z, &stats);
            for d in 0..FEATURE_DIM {
                assert!((back[d] - orig[d]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_kmeans_separates_distinct_groups() {
        // Two tight groups far apart, k = 2.
        let points = vec![
            [0.0, 0.0, 0.0],
            [0.1, 0.1, 0.0],
            [0.2, 0.0, 0.1],
            [10.0, 10.0, 10.0],
            [10.1, 9.9, 10.0],
            [9.9, 10.1, 10.2],
        ];
        let result = kmeans(&points, 2, &config());

        assert_eq!(result.assignments.len(), 6);
        assert_eq!(result.assignments[0], result.assignments[1]);
        assert_eq!(result.assignments[1], result.assignments[2]);
        assert_eq!(result.assignments[3], result.assignments[4]);
        assert_eq!(result.assignments[4], result.assignments[5]);
        assert_ne!(result.assignments[0], result.assignments[3]);
    }

    #[test]
    fn test_kmeans_is_deterministic_for_fixed_seed() {
        let points: Vec<[f64; FEATURE_DIM]> = (0..20)
            .map(|i| {
                let x = i as f64;
                [x * 3.7 % 11.0, x * 1.3 % 5.0, x * 2.9 % 7.0]
            })
            .collect();

        let a = kmeans(&points, 3, &config());
        let b = kmeans(&points, 3, &config());
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_kmeans_k_one_centroid_is_mean() {
        let points = vec![[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]];
        let result = kmeans(&points, 1, &config());
        assert_eq!(result.assignments, vec![0, 0]);
        assert!((result.centroids[0][0] - 1.0).abs() < 1e-9);
        assert!((result.centroids[0][1] - 2.0).abs() < 1e-9);
        assert!((result.centroids[0][2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_kmeans_uses_every_label_with_duplicate_points() {
        // More clusters requested than distinct locations.
        let points = vec![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [9.0, 9.0, 9.0]];
        let result = kmeans(&points, 3, &config());

        let mut seen = [false; 3];
        for &a in &result.assignments {
            seen[a] = true;
        }
        assert!(seen.iter().all(|&s| s), "every cluster label should be used");
    }
}
