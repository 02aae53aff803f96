//! Fitness profile model and its request payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::plan::ExerciseEntry;

/// Personalization data stored in Firestore, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub gender: String,
    /// Body weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    pub date_of_birth: NaiveDate,
    /// Primary goal for exercising
    pub goal: String,
    /// How often the user exercised in the past
    pub exercise_history: String,
    pub intensity: String,
    /// Preferred workout duration, e.g. "30 minutes"
    pub duration: String,
    /// Comma-separated days of the week
    pub workout_days: String,
    pub workout_time_of_day: String,
    /// Latest generated plan, if any
    #[serde(default)]
    pub recommended_exercise_plan: Option<Vec<ExerciseEntry>>,
    /// When the profile was created (RFC3339)
    pub created_at: String,
}

/// Body of `POST /api/auth/personalize`.
///
/// Field aliases accept the names used by the web client's form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonalizeRequest {
    #[serde(alias = "your_gender")]
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[validate(range(exclusive_min = 0.0, message = "weight must be positive"))]
    pub weight: f64,
    #[validate(range(exclusive_min = 0.0, message = "height must be positive"))]
    pub height: f64,
    pub date_of_birth: NaiveDate,
    #[serde(alias = "primary_goal_for_exercising")]
    #[validate(length(min = 1, message = "goal is required"))]
    pub goal: String,
    #[serde(alias = "how_often_exercised_at_past")]
    pub exercise_history: String,
    #[serde(alias = "workout_intensity")]
    pub intensity: String,
    #[serde(alias = "workout_duration")]
    #[validate(length(min = 1, message = "duration is required"))]
    pub duration: String,
    #[serde(alias = "what_days_a_week_you_will_workout")]
    pub workout_days: String,
    #[serde(alias = "what_time_of_day_you_will_workout")]
    pub workout_time_of_day: String,
}

impl PersonalizeRequest {
    /// Build the stored profile for `email`. The plan starts empty.
    pub fn into_profile(self, email: &str, created_at: String) -> Profile {
        Profile {
            email: email.to_string(),
            gender: self.gender,
            weight: self.weight,
            height: self.height,
            date_of_birth: self.date_of_birth,
            goal: self.goal,
            exercise_history: self.exercise_history,
            intensity: self.intensity,
            duration: self.duration,
            workout_days: self.workout_days,
            workout_time_of_day: self.workout_time_of_day,
            recommended_exercise_plan: None,
            created_at,
        }
    }
}

/// Body of `PATCH /api/auth/profile/update`.
///
/// Absent and `null` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(alias = "your_gender")]
    pub gender: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "weight must be positive"))]
    pub weight: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "height must be positive"))]
    pub height: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(alias = "primary_goal_for_exercising")]
    pub goal: Option<String>,
    #[serde(alias = "how_often_exercised_at_past")]
    pub exercise_history: Option<String>,
    #[serde(alias = "workout_intensity")]
    pub intensity: Option<String>,
    #[serde(alias = "workout_duration")]
    pub duration: Option<String>,
    #[serde(alias = "what_days_a_week_you_will_workout")]
    pub workout_days: Option<String>,
    #[serde(alias = "what_time_of_day_you_will_workout")]
    pub workout_time_of_day: Option<String>,
}

impl ProfileUpdate {
    /// Merge the present fields into `profile`.
    ///
    /// Returns the stored field names that were applied, in a fixed order.
    pub fn apply_to(self, profile: &mut Profile) -> Vec<&'static str> {
        let mut applied = Vec::new();

        fn set<T>(
            slot: &mut T,
            value: Option<T>,
            name: &'static str,
            applied: &mut Vec<&'static str>,
        ) {
            if let Some(value) = value {
                *slot = value;
                applied.push(name);
            }
        }

        set(&mut profile.gender, self.gender, "gender", &mut applied);
        set(&mut profile.weight, self.weight, "weight", &mut applied);
        set(&mut profile.height, self.height, "height", &mut applied);
        set(&mut profile.date_of_birth, self.date_of_birth, "date_of_birth", &mut applied);
        set(&mut profile.goal, self.goal, "goal", &mut applied);
        set(
            &mut profile.exercise_history,
            self.exercise_history,
            "exercise_history",
            &mut applied,
        );
        set(&mut profile.intensity, self.intensity, "intensity", &mut applied);
        set(&mut profile.duration, self.duration, "duration", &mut applied);
        set(&mut profile.workout_days, self.workout_days, "workout_days", &mut applied);
        set(
            &mut profile.workout_time_of_day,
            self.workout_time_of_day,
            "workout_time_of_day",
            &mut applied,
        );

        applied
    }
}
