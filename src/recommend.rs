use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::aggregate::{aggregate_attempts, round2};
use crate::classify::{classify_cohort, classify_student, level_for_score};
use crate::config::EngineConfig;
use crate::difficulty::adjustment_for_score;
use crate::error::EngineError;
use crate::types::{
    AttemptRecord, DifficultyAdjustment, ProficiencyLevel, ProgressSummary, Recommendation,
    StudentAggregates, StudentStats, TopicAggregate, TopicCatalogEntry,
};

/// Pick the next topic for a student from their per-topic aggregates and the
/// full catalog.
///
/// Policy: students performing strongly explore the first catalog topic they
/// have never attempted; everyone else is sent back to their weakest topic.
/// Remediation wins over exploration whenever performance is not clearly
/// strong. With no history at all, the first catalog topic (or the
/// configured placeholder) starts them off.
pub fn recommend(
    student_id: i64,
    topics: &[TopicAggregate],
    catalog: &[TopicCatalogEntry],
    config: &EngineConfig,
) -> Result<Recommendation, EngineError> {
    for topic in topics {
        validate_aggregate(topic)?;
    }

    if topics.is_empty() {
        return Ok(cold_start(student_id, catalog, config));
    }

    // Attempt-count-weighted mean; an unweighted mean of per-topic averages
    // would skew toward topics with few attempts. Zero counts never occur in
    // well-formed aggregates and are treated as 1.
    let total_attempts: u32 = topics.iter().map(|t| t.attempt_count.max(1)).sum();
    let weighted_score: f64 = topics
        .iter()
        .map(|t| t.avg_score * t.attempt_count.max(1) as f64)
        .sum();
    let overall_avg = weighted_score / total_attempts as f64;

    let current_level = level_for_score(overall_avg, &config.thresholds);
    let difficulty_adjustment = adjustment_for_score(overall_avg, &config.thresholds);

    let weakest = weakest_topic(topics);
    let attempted: HashSet<i64> = topics.iter().map(|t| t.topic_id).collect();

    let mut reasoning_parts = vec![
        format!("Overall average score: {overall_avg:.1}%."),
        format!("Current level determined as {current_level}."),
    ];

    let (recommended_topic_id, recommended_topic_name) =
        if difficulty_adjustment == DifficultyAdjustment::Increase {
            match catalog.iter().find(|t| !attempted.contains(&t.id)) {
                Some(fresh) => {
                    reasoning_parts.push(format!(
                        "You are performing well! Exploring new topic: {}.",
                        fresh.name
                    ));
                    (fresh.id, fresh.name.clone())
                }
                None => {
                    reasoning_parts.push(format!(
                        "All topics attempted. Revisiting strongest improvement area: {}.",
                        weakest.topic_name
                    ));
                    (weakest.topic_id, weakest.topic_name.clone())
                }
            }
        } else {
            reasoning_parts.push(format!(
                "Weakest topic '{}' scored {:.1}%. Recommended for improvement.",
                weakest.topic_name, weakest.avg_score
            ));
            (weakest.topic_id, weakest.topic_name.clone())
        };

    reasoning_parts.push(format!("Difficulty adjustment: {difficulty_adjustment}."));

    debug!(
        student_id = student_id,
        overall_avg = overall_avg,
        level = current_level.as_str(),
        adjustment = difficulty_adjustment.as_str(),
        topic_id = recommended_topic_id,
        "Recommendation generated"
    );

    Ok(Recommendation {
        student_id,
        current_level,
        recommended_topic_id,
        recommended_topic_name,
        difficulty_adjustment,
        reasoning: reasoning_parts.join(" "),
    })
}

/// Aggregate raw attempts by topic and recommend in one call, the way the
/// recommendations endpoint consumes the engine.
pub fn recommend_from_attempts(
    student_id: i64,
    attempts: &[AttemptRecord],
    catalog: &[TopicCatalogEntry],
    config: &EngineConfig,
) -> Result<Recommendation, EngineError> {
    let aggregates = aggregate_attempts(student_id, attempts, config.default_time_seconds)?;
    recommend(student_id, &aggregates.topics, catalog, config)
}

fn cold_start(
    student_id: i64,
    catalog: &[TopicCatalogEntry],
    config: &EngineConfig,
) -> Recommendation {
    let (topic_id, topic_name) = match catalog.first() {
        Some(first) => (first.id, first.name.clone()),
        None => (config.fallback_topic_id, config.fallback_topic_name.clone()),
    };

    debug!(student_id = student_id, topic_id = topic_id, "Cold start recommendation");

    Recommendation {
        student_id,
        current_level: ProficiencyLevel::Beginner,
        recommended_topic_id: topic_id,
        recommended_topic_name: topic_name,
        difficulty_adjustment: DifficultyAdjustment::Maintain,
        reasoning: "No prior attempts found. Starting with the first available topic.".to_string(),
    }
}

/// Minimum avg_score; ties keep the earliest entry in input order.
fn weakest_topic(topics: &[TopicAggregate]) -> &TopicAggregate {
    let mut weakest = &topics[0];
    for topic in &topics[1..] {
        if topic.avg_score < weakest.avg_score {
            weakest = topic;
        }
    }
    weakest
}

fn validate_aggregate(topic: &TopicAggregate) -> Result<(), EngineError> {
    if !topic.avg_score.is_finite() {
        return Err(EngineError::NonFiniteInput { field: "avg_score" });
    }
    if !(0.0..=100.0).contains(&topic.avg_score) {
        return Err(EngineError::ScoreOutOfRange {
            value: topic.avg_score,
        });
    }
    Ok(())
}

/// Stateless facade bundling the engine's call surfaces with one
/// configuration. Safe to share across request handlers; every method is a
/// pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn aggregate(
        &self,
        student_id: i64,
        attempts: &[AttemptRecord],
    ) -> Result<StudentAggregates, EngineError> {
        aggregate_attempts(student_id, attempts, self.config.default_time_seconds)
    }

    pub fn classify_student(&self, stats: &StudentStats) -> ProficiencyLevel {
        classify_student(stats, &self.config.thresholds)
    }

    pub fn classify_cohort(
        &self,
        cohort: &[StudentStats],
    ) -> Result<HashMap<i64, ProficiencyLevel>, EngineError> {
        classify_cohort(cohort, &self.config)
    }

    pub fn recommend(
        &self,
        student_id: i64,
        topics: &[TopicAggregate],
        catalog: &[TopicCatalogEntry],
    ) -> Result<Recommendation, EngineError> {
        recommend(student_id, topics, catalog, &self.config)
    }

    pub fn recommend_from_attempts(
        &self,
        student_id: i64,
        attempts: &[AttemptRecord],
        catalog: &[TopicCatalogEntry],
    ) -> Result<Recommendation, EngineError> {
        recommend_from_attempts(student_id, attempts, catalog, &self.config)
    }

    /// Progress view: overall stats, rule-based level, per-topic breakdown.
    /// Scores are rounded to two decimals for display.
    pub fn student_summary(
        &self,
        student_id: i64,
        attempts: &[AttemptRecord],
    ) -> Result<ProgressSummary, EngineError> {
        let StudentAggregates { stats, topics } = self.aggregate(student_id, attempts)?;
        let current_level = self.classify_student(&stats);

        Ok(ProgressSummary {
            student_id,
            total_attempts: stats.total_attempts,
            avg_score: round2(stats.avg_score),
            current_level,
            topic_progress: topics
                .into_iter()
                .map(|t| TopicAggregate {
                    avg_score: round2(t.avg_score),
                    ..t
                })
                .collect(),
        })
    }
}
