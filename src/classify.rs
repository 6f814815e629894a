use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::clustering::{destandardize, kmeans, standardize, FeatureStats, FEATURE_DIM};
use crate::config::{EngineConfig, LevelThresholds};
use crate::error::EngineError;
use crate::types::{ProficiencyLevel, StudentStats};

/// Rule-based classification of a single student. Lower bound inclusive,
/// upper bound exclusive: 40.0 is `Intermediate`, 70.0 is `Advanced`.
pub fn classify_student(stats: &StudentStats, thresholds: &LevelThresholds) -> ProficiencyLevel {
    level_for_score(stats.avg_score, thresholds)
}

pub(crate) fn level_for_score(avg_score: f64, thresholds: &LevelThresholds) -> ProficiencyLevel {
    if avg_score < thresholds.beginner_max {
        ProficiencyLevel::Beginner
    } else if avg_score < thresholds.intermediate_max {
        ProficiencyLevel::Intermediate
    } else {
        ProficiencyLevel::Advanced
    }
}

/// Classify a whole cohort at once.
///
/// Cohorts below the configured minimum fall back to per-student rule-based
/// levels; larger cohorts are clustered over standardized
/// (avg_score, total_attempts, avg_time) with `k = min(3, cohort_size)` and
/// cluster centroids ranked by their de-standardized avg_score, ascending.
/// Cluster indices coming out of k-means are arbitrary; the ranking is what
/// makes the labels meaningful.
pub fn classify_cohort(
    cohort: &[StudentStats],
    config: &EngineConfig,
) -> Result<HashMap<i64, ProficiencyLevel>, EngineError> {
    let mut seen = HashSet::with_capacity(cohort.len());
    for stats in cohort {
        validate_stats(stats)?;
        if !seen.insert(stats.student_id) {
            return Err(EngineError::DuplicateStudent {
                student_id: stats.student_id,
            });
        }
    }

    if cohort.is_empty() || cohort.len() < config.clustering.min_cohort_size {
        debug!(
            cohort_size = cohort.len(),
            min_cohort_size = config.clustering.min_cohort_size,
            "Cohort below clustering minimum, using rule-based levels"
        );
        return Ok(cohort
            .iter()
            .map(|s| (s.student_id, classify_student(s, &config.thresholds)))
            .collect());
    }

    let points: Vec<[f64; FEATURE_DIM]> = cohort.iter().map(feature_vector).collect();
    let (scaled, feature_stats) = standardize(&points);

    let k = config.clustering.max_clusters.min(cohort.len());
    let result = kmeans(&scaled, k, &config.clustering);
    let labels = rank_cluster_labels(&result.centroids, &feature_stats);

    debug!(cohort_size = cohort.len(), k = k, "Cohort clustering complete");

    Ok(cohort
        .iter()
        .zip(result.assignments.iter())
        .map(|(s, &cluster)| (s.student_id, labels[cluster]))
        .collect())
}

fn feature_vector(stats: &StudentStats) -> [f64; FEATURE_DIM] {
    [
        stats.avg_score,
        stats.total_attempts as f64,
        stats.avg_time_seconds,
    ]
}

/// Sort cluster indices by the avg_score component of their centroid
/// (ascending, back on the original scale) and hand out levels in rank
/// order. With `k < 3` only the first `k` levels are used.
fn rank_cluster_labels(
    centroids: &[[f64; FEATURE_DIM]],
    feature_stats: &[FeatureStats; FEATURE_DIM],
) -> Vec<ProficiencyLevel> {
    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|&a, &b| {
        let score_a = destandardize(&centroids[a], feature_stats)[0];
        let score_b = destandardize(&centroids[b], feature_stats)[0];
        score_a
            .partial_cmp(&score_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut labels = vec![ProficiencyLevel::Beginner; centroids.len()];
    for (rank, &cluster) in order.iter().enumerate() {
        labels[cluster] = ProficiencyLevel::ALL[rank.min(ProficiencyLevel::ALL.len() - 1)];
    }
    labels
}

fn validate_stats(stats: &StudentStats) -> Result<(), EngineError> {
    if !stats.avg_score.is_finite() {
        return Err(EngineError::NonFiniteInput { field: "avg_score" });
    }
    if !(0.0..=100.0).contains(&stats.avg_score) {
        return Err(EngineError::ScoreOutOfRange {
            value: stats.avg_score,
        });
    }
    if !stats.avg_time_seconds.is_finite() {
        return Err(EngineError::NonFiniteInput {
            field: "avg_time_seconds",
        });
    }
    if stats.avg_time_seconds < 0.0 {
        return Err(EngineError::NegativeTime {
            value: stats.avg_time_seconds,
        });
    }
    Ok(())
}
