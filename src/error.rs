use thiserror::Error;

/// Input-validation failures. The engine never errors on well-formed input:
/// cold start, unknown level labels and undersized cohorts all have
/// documented fallbacks. Only shape violations fail fast, and it is the
/// caller's job to translate them into a user-facing response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("score {value} is outside the valid range 0-100")]
    ScoreOutOfRange { value: f64 },
    #[error("time_taken_seconds {value} is negative")]
    NegativeTime { value: f64 },
    #[error("{field} is not a finite number")]
    NonFiniteInput { field: &'static str },
    #[error("student {student_id} appears more than once in the cohort")]
    DuplicateStudent { student_id: i64 },
}
