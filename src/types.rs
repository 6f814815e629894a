use serde::{Deserialize, Serialize};

/// Ordered proficiency scale. The ordering is load-bearing: difficulty
/// adjustments move exactly one step along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum ProficiencyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Parse a stored level label. Unrecognized labels fall back to
    /// `Intermediate` rather than erroring.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "advanced" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }

    /// One step up the scale, saturating at `Advanced`.
    pub fn promote(&self) -> Self {
        match self {
            Self::Beginner => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    /// One step down the scale, saturating at `Beginner`.
    pub fn demote(&self) -> Self {
        match self {
            Self::Advanced => Self::Intermediate,
            _ => Self::Beginner,
        }
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional difficulty signal derived from overall performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum DifficultyAdjustment {
    Decrease,
    #[default]
    Maintain,
    Increase,
}

impl DifficultyAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decrease => "Decrease",
            Self::Maintain => "Maintain",
            Self::Increase => "Increase",
        }
    }
}

impl std::fmt::Display for DifficultyAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graded quiz attempt, as handed over by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub topic_id: i64,
    pub topic_name: String,
    /// Percentage score, 0-100.
    pub score: f64,
    pub time_taken_seconds: f64,
}

/// Summary statistics over a student's full attempt history. Recomputed on
/// every call, never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentStats {
    pub student_id: i64,
    pub avg_score: f64,
    pub total_attempts: u32,
    pub avg_time_seconds: f64,
}

/// Per-topic rollup of a student's attempts. Only topics with at least one
/// attempt appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAggregate {
    pub topic_id: i64,
    pub topic_name: String,
    pub avg_score: f64,
    pub attempt_count: u32,
}

/// A topic known to the system, attempted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCatalogEntry {
    pub id: i64,
    pub name: String,
}

/// Combined output of the feature aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAggregates {
    pub stats: StudentStats,
    pub topics: Vec<TopicAggregate>,
}

/// Progress view of one student: overall stats, rule-based level, and the
/// per-topic breakdown with scores rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub student_id: i64,
    pub total_attempts: u32,
    pub avg_score: f64,
    pub current_level: ProficiencyLevel,
    pub topic_progress: Vec<TopicAggregate>,
}

/// The engine's final product. Ownership transfers to the caller; persisting
/// it is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub student_id: i64,
    pub current_level: ProficiencyLevel,
    pub recommended_topic_id: i64,
    pub recommended_topic_name: String,
    pub difficulty_adjustment: DifficultyAdjustment,
    pub reasoning: String,
}
