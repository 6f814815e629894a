use crate::config::LevelThresholds;
use crate::types::{DifficultyAdjustment, ProficiencyLevel};

/// Directional signal from an overall average score. The cut points mirror
/// the classifier's thresholds but are evaluated independently of it.
pub fn adjustment_for_score(
    avg_score: f64,
    thresholds: &LevelThresholds,
) -> DifficultyAdjustment {
    if avg_score < thresholds.beginner_max {
        DifficultyAdjustment::Decrease
    } else if avg_score >= thresholds.intermediate_max {
        DifficultyAdjustment::Increase
    } else {
        DifficultyAdjustment::Maintain
    }
}

/// Move one step along the proficiency scale, saturating at both ends.
pub fn next_level(current: ProficiencyLevel, adjustment: DifficultyAdjustment) -> ProficiencyLevel {
    match adjustment {
        DifficultyAdjustment::Increase => current.promote(),
        DifficultyAdjustment::Decrease => current.demote(),
        DifficultyAdjustment::Maintain => current,
    }
}

/// Same, but from a stored label. Unrecognized labels are treated as
/// `Intermediate` before stepping; the storage layer keeps levels as text.
pub fn next_level_label(current: &str, adjustment: DifficultyAdjustment) -> ProficiencyLevel {
    next_level(ProficiencyLevel::parse(current), adjustment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_thresholds() {
        let thresholds = LevelThresholds::default();
        assert_eq!(
            adjustment_for_score(0.0, &thresholds),
            DifficultyAdjustment::Decrease
        );
        assert_eq!(
            adjustment_for_score(39.99, &thresholds),
            DifficultyAdjustment::Decrease
        );
        assert_eq!(
            adjustment_for_score(40.0, &thresholds),
            DifficultyAdjustment::Maintain
        );
        assert_eq!(
            adjustment_for_score(69.99, &thresholds),
            DifficultyAdjustment::Maintain
        );
        assert_eq!(
            adjustment_for_score(70.0, &thresholds),
            DifficultyAdjustment::Increase
        );
        assert_eq!(
            adjustment_for_score(100.0, &thresholds),
            DifficultyAdjustment::Increase
        );
    }

    #[test]
    fn test_maintain_is_identity() {
        for level in ProficiencyLevel::ALL {
            assert_eq!(next_level(level, DifficultyAdjustment::Maintain), level);
        }
    }

    #[test]
    fn test_no_wraparound_at_the_ends() {
        assert_eq!(
            next_level(ProficiencyLevel::Advanced, DifficultyAdjustment::Increase),
            ProficiencyLevel::Advanced
        );
        assert_eq!(
            next_level(ProficiencyLevel::Beginner, DifficultyAdjustment::Decrease),
            ProficiencyLevel::Beginner
        );
    }

    #[test]
    fn test_single_step_moves() {
        assert_eq!(
            next_level(ProficiencyLevel::Beginner, DifficultyAdjustment::Increase),
            ProficiencyLevel::Intermediate
        );
        assert_eq!(
            next_level(ProficiencyLevel::Intermediate, DifficultyAdjustment::Increase),
            ProficiencyLevel::Advanced
        );
        assert_eq!(
            next_level(ProficiencyLevel::Advanced, DifficultyAdjustment::Decrease),
            ProficiencyLevel::Intermediate
        );
    }

    #[test]
    fn test_unrecognized_label_steps_from_intermediate() {
        assert_eq!(
            next_level_label("Expert", DifficultyAdjustment::Increase),
            ProficiencyLevel::Advanced
        );
        assert_eq!(
            next_level_label("", DifficultyAdjustment::Decrease),
            ProficiencyLevel::Beginner
        );
        assert_eq!(
            next_level_label("advanced", DifficultyAdjustment::Increase),
            ProficiencyLevel::Advanced
        );
    }
}
