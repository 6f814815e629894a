use std::collections::HashMap;

use crate::error::EngineError;
use crate::types::{AttemptRecord, StudentAggregates, StudentStats, TopicAggregate};

/// Reduce a student's attempt history to overall stats plus per-topic
/// aggregates.
///
/// An empty history yields `avg_score = 0`, `total_attempts = 0` and the
/// supplied default time: the cold-start signal, not a measured zero-score
/// student. Topic aggregates come out in order of each topic's first
/// appearance in the input, which keeps downstream tie-breaks reproducible.
pub fn aggregate_attempts(
    student_id: i64,
    attempts: &[AttemptRecord],
    default_time_seconds: f64,
) -> Result<StudentAggregates, EngineError> {
    for attempt in attempts {
        validate_attempt(attempt)?;
    }

    if attempts.is_empty() {
        return Ok(StudentAggregates {
            stats: StudentStats {
                student_id,
                avg_score: 0.0,
                total_attempts: 0,
                avg_time_seconds: default_time_seconds,
            },
            topics: Vec::new(),
        });
    }

    let count = attempts.len() as f64;
    let avg_score = attempts.iter().map(|a| a.score).sum::<f64>() / count;
    let avg_time = attempts.iter().map(|a| a.time_taken_seconds).sum::<f64>() / count;

    // Group by topic, first appearance fixes the output position.
    let mut order: Vec<i64> = Vec::new();
    let mut buckets: HashMap<i64, (String, f64, u32)> = HashMap::new();
    for attempt in attempts {
        let entry = buckets.entry(attempt.topic_id).or_insert_with(|| {
            order.push(attempt.topic_id);
            (attempt.topic_name.clone(), 0.0, 0)
        });
        entry.1 += attempt.score;
        entry.2 += 1;
    }

    let topics = order
        .into_iter()
        .map(|topic_id| {
            let (topic_name, score_sum, attempt_count) = buckets
                .remove(&topic_id)
                .unwrap_or((String::new(), 0.0, 1));
            TopicAggregate {
                topic_id,
                topic_name,
                avg_score: score_sum / attempt_count.max(1) as f64,
                attempt_count,
            }
        })
        .collect();

    Ok(StudentAggregates {
        stats: StudentStats {
            student_id,
            avg_score,
            total_attempts: attempts.len() as u32,
            avg_time_seconds: avg_time,
        },
        topics,
    })
}

fn validate_attempt(attempt: &AttemptRecord) -> Result<(), EngineError> {
    if !attempt.score.is_finite() {
        return Err(EngineError::NonFiniteInput { field: "score" });
    }
    if !(0.0..=100.0).contains(&attempt.score) {
        return Err(EngineError::ScoreOutOfRange {
            value: attempt.score,
        });
    }
    if !attempt.time_taken_seconds.is_finite() {
        return Err(EngineError::NonFiniteInput {
            field: "time_taken_seconds",
        });
    }
    if attempt.time_taken_seconds < 0.0 {
        return Err(EngineError::NegativeTime {
            value: attempt.time_taken_seconds,
        });
    }
    Ok(())
}

/// Round to two decimals for display surfaces; aggregates keep full
/// precision internally.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(topic_id: i64, name: &str, score: f64, time: f64) -> AttemptRecord {
        AttemptRecord {
            topic_id,
            topic_name: name.to_string(),
            score,
            time_taken_seconds: time,
        }
    }

    #[test]
    fn test_empty_history_is_cold_start_signal() {
        let result = aggregate_attempts(7, &[], 60.0).unwrap();
        assert_eq!(result.stats.avg_score, 0.0);
        assert_eq!(result.stats.total_attempts, 0);
        assert_eq!(result.stats.avg_time_seconds, 60.0);
        assert!(result.topics.is_empty());
    }

    #[test]
    fn test_means_and_counts() {
        let attempts = vec![
            attempt(1, "Algebra", 80.0, 30.0),
            attempt(1, "Algebra", 60.0, 50.0),
            attempt(2, "Geometry", 90.0, 40.0),
        ];
        let result = aggregate_attempts(1, &attempts, 60.0).unwrap();
        assert!((result.stats.avg_score - 230.0 / 3.0).abs() < 1e-9);
        assert!((result.stats.avg_time_seconds - 40.0).abs() < 1e-9);
        assert_eq!(result.stats.total_attempts, 3);

        assert_eq!(result.topics.len(), 2);
        assert_eq!(result.topics[0].topic_id, 1);
        assert!((result.topics[0].avg_score - 70.0).abs() < 1e-9);
        assert_eq!(result.topics[0].attempt_count, 2);
        assert_eq!(result.topics[1].topic_id, 2);
        assert_eq!(result.topics[1].attempt_count, 1);
    }

    #[test]
    fn test_grouping_order_follows_first_appearance() {
        let attempts = vec![
            attempt(5, "E", 50.0, 10.0),
            attempt(2, "B", 40.0, 10.0),
            attempt(5, "E", 70.0, 10.0),
            attempt(9, "I", 90.0, 10.0),
        ];
        let result = aggregate_attempts(1, &attempts, 60.0).unwrap();
        let ids: Vec<i64> = result.topics.iter().map(|t| t.topic_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_rejects_out_of_range_score() {
        let err = aggregate_attempts(1, &[attempt(1, "A", 101.0, 10.0)], 60.0).unwrap_err();
        assert_eq!(err, EngineError::ScoreOutOfRange { value: 101.0 });

        let err = aggregate_attempts(1, &[attempt(1, "A", -0.5, 10.0)], 60.0).unwrap_err();
        assert_eq!(err, EngineError::ScoreOutOfRange { value: -0.5 });
    }

    #[test]
    fn test_rejects_negative_time_and_non_finite_values() {
        let err = aggregate_attempts(1, &[attempt(1, "A", 50.0, -1.0)], 60.0).unwrap_err();
        assert_eq!(err, EngineError::NegativeTime { value: -1.0 });

        let err = aggregate_attempts(1, &[attempt(1, "A", f64::NAN, 10.0)], 60.0).unwrap_err();
        assert_eq!(err, EngineError::NonFiniteInput { field: "score" });
    }
}
