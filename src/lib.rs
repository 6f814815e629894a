//! Recommendation engine for the QuizPath adaptive-learning backend.
//!
//! Turns a student's raw quiz-attempt history into a proficiency level, a
//! directional difficulty adjustment, and a single next-topic recommendation
//! with a human-readable justification. The engine is a pure computation
//! library: it receives attempt records and the topic catalog from the
//! surrounding service layer, returns owned values, and touches neither
//! storage nor the network. All randomness (k-means initialization) runs off
//! a fixed seed, so identical inputs always produce identical outputs.

pub mod aggregate;
pub mod classify;
pub mod clustering;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod recommend;
pub mod types;

pub use aggregate::aggregate_attempts;
pub use classify::{classify_cohort, classify_student};
pub use config::{ClusteringConfig, EngineConfig, LevelThresholds};
pub use difficulty::{adjustment_for_score, next_level, next_level_label};
pub use error::EngineError;
pub use recommend::{recommend, recommend_from_attempts, RecommendationEngine};
pub use types::*;
