use serde::{Deserialize, Serialize};

const DEFAULT_BEGINNER_MAX_SCORE: f64 = 40.0;
const DEFAULT_INTERMEDIATE_MAX_SCORE: f64 = 70.0;
const DEFAULT_MAX_CLUSTERS: usize = 3;
const DEFAULT_MIN_COHORT_SIZE: usize = 3;
const DEFAULT_MAX_ITERATIONS: usize = 100;
const DEFAULT_CLUSTERING_SEED: u64 = 42;
const DEFAULT_TIME_SECONDS: f64 = 60.0;
const FALLBACK_TOPIC_ID: i64 = 1;
const FALLBACK_TOPIC_NAME: &str = "Introduction";

/// Score cut points shared by the rule-based classifier and the difficulty
/// adjuster. Lower bound inclusive, upper bound exclusive: a 40.0 average is
/// `Intermediate`, a 70.0 average is `Advanced`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub beginner_max: f64,
    pub intermediate_max: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            beginner_max: DEFAULT_BEGINNER_MAX_SCORE,
            intermediate_max: DEFAULT_INTERMEDIATE_MAX_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Upper bound on k; the effective k is `min(max_clusters, cohort_size)`.
    pub max_clusters: usize,
    /// Cohorts smaller than this are classified rule-based instead.
    pub min_cohort_size: usize,
    pub max_iterations: usize,
    /// Fixed seed so identical cohorts always receive identical labels.
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
            min_cohort_size: DEFAULT_MIN_COHORT_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: DEFAULT_CLUSTERING_SEED,
        }
    }
}

/// Everything the engine is allowed to know. Passed explicitly to keep every
/// call reentrant; there is no ambient configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub thresholds: LevelThresholds,
    pub clustering: ClusteringConfig,
    /// Assumed attempt duration in seconds when none has been measured.
    pub default_time_seconds: f64,
    /// Placeholder topic for the cold-start case with an empty catalog.
    pub fallback_topic_id: i64,
    pub fallback_topic_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: LevelThresholds::default(),
            clustering: ClusteringConfig::default(),
            default_time_seconds: DEFAULT_TIME_SECONDS,
            fallback_topic_id: FALLBACK_TOPIC_ID,
            fallback_topic_name: FALLBACK_TOPIC_NAME.to_string(),
        }
    }
}
