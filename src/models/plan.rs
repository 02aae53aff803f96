// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommended workout plan entries.

use serde::{Deserialize, Serialize};

use crate::models::leaderboard::{is_known_exercise, EXERCISES};

/// One exercise in a recommended plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise_name: String,
    pub exercise_reps: u32,
    pub exercise_sets: u32,
    /// Free-form duration as produced by the model, e.g. "10 minutes"
    pub duration: String,
    /// Day of the week the exercise is scheduled for
    pub day: String,
}

/// Reasons a generated plan is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("plan is empty")]
    Empty,

    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    #[error("missing exercise '{0}'")]
    MissingExercise(&'static str),

    #[error("exercise '{0}' must have positive reps and sets")]
    NonPositiveVolume(String),

    #[error("exercise '{0}' is missing a duration or day")]
    MissingSchedule(String),
}

/// Check a parsed plan against the fixed exercise set.
pub fn validate_plan(plan: &[ExerciseEntry]) -> Result<(), PlanError> {
    if plan.is_empty() {
        return Err(PlanError::Empty);
    }

    for entry in plan {
        if !is_known_exercise(&entry.exercise_name) {
            return Err(PlanError::UnknownExercise(entry.exercise_name.clone()));
        }
        if entry.exercise_reps == 0 || entry.exercise_sets == 0 {
            return Err(PlanError::NonPositiveVolume(entry.exercise_name.clone()));
        }
        if entry.duration.trim().is_empty() || entry.day.trim().is_empty() {
            return Err(PlanError::MissingSchedule(entry.exercise_name.clone()));
        }
    }

    if let Some(missing) = EXERCISES
        .iter()
        .find(|name| !plan.iter().any(|e| e.exercise_name == **name))
    {
        return Err(PlanError::MissingExercise(*missing));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ExerciseEntry {
        ExerciseEntry {
            exercise_name: name.to_string(),
            exercise_reps: 12,
            exercise_sets: 3,
            duration: "5 minutes".to_string(),
            day: "Monday".to_string(),
        }
    }

    fn full_plan() -> Vec<ExerciseEntry> {
        EXERCISES.iter().map(|name| entry(name)).collect()
    }

    #[test]
    fn test_valid_plan() {
        assert_eq!(validate_plan(&full_plan()), Ok(()));
    }

    #[test]
    fn test_empty_plan() {
        assert_eq!(validate_plan(&[]), Err(PlanError::Empty));
    }

    #[test]
    fn test_unknown_exercise() {
        let mut plan = full_plan();
        plan.push(entry("Burpees"));
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::UnknownExercise("Burpees".to_string()))
        );
    }

    #[test]
    fn test_missing_exercise() {
        let plan: Vec<ExerciseEntry> = full_plan()
            .into_iter()
            .filter(|e| e.exercise_name != "Crunches")
            .collect();
        assert_eq!(
            validate_plan(&plan),
            Err(PlanError::MissingExercise("Crunches"))
        );
    }

    #[test]
    fn test_zero_sets_rejected() {
        let mut plan = full_plan();
        plan[1].exercise_sets = 0;
        assert!(matches!(
            validate_plan(&plan),
            Err(PlanError::NonPositiveVolume(_))
        ));
    }

    #[test]
    fn test_blank_day_rejected() {
        let mut plan = full_plan();
        plan[0].day = "  ".to_string();
        assert!(matches!(
            validate_plan(&plan),
            Err(PlanError::MissingSchedule(_))
        ));
    }
}
