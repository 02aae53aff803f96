// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard points per account.
//!
//! Each entry keeps two mappings keyed by exercise name: the running
//! all-time total and the points earned on `last_updated`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of exercises that earn points.
pub const EXERCISES: [&str; 4] = ["Pushups", "Squats", "Crunches", "Bicep Curls"];

/// Points per exercise name.
pub type Points = BTreeMap<String, i64>;

/// Largest score accepted in a single update.
pub const MAX_SCORE: i64 = 100_000;

/// Returns `true` if `name` is one of the scored exercises.
pub fn is_known_exercise(name: &str) -> bool {
    EXERCISES.contains(&name)
}

/// A points mapping with every exercise set to zero.
pub fn zeroed_points() -> Points {
    EXERCISES.iter().map(|name| (name.to_string(), 0)).collect()
}

/// Sum of points across all exercises.
pub fn points_sum(points: &Points) -> i64 {
    points.values().sum()
}

/// Leaderboard row stored in Firestore, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub email: String,
    pub username: String,
    #[serde(default = "zeroed_points")]
    pub total_points: Points,
    #[serde(default = "zeroed_points")]
    pub today_points: Points,
    pub created_on: NaiveDate,
    pub last_updated: NaiveDate,
}

/// Reasons a score cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("points for '{0}' would overflow")]
    Overflow(String),
}

/// Outcome of applying a score to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// Same day as the last update; today's points accumulated.
    Accumulated,
    /// First score of a new day; today's points were reset first.
    RolledOver,
}

impl LeaderboardEntry {
    /// New zeroed entry created alongside a profile.
    pub fn new(email: &str, username: &str, today: NaiveDate) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            total_points: zeroed_points(),
            today_points: zeroed_points(),
            created_on: today,
            last_updated: today,
        }
    }

    /// Apply `score` points for `exercise` on `today`.
    ///
    /// The caller must have checked `exercise` with [`is_known_exercise`].
    /// `total_points` always accumulates. `today_points` accumulates when the
    /// entry was last updated today; otherwise `last_updated` moves to today
    /// and the whole `today_points` map is zeroed before the score is applied,
    /// not just the entry for `exercise`. A stale count for another exercise
    /// would otherwise show up in today's ranking.
    ///
    /// On overflow the entry is left unchanged.
    pub fn apply_score(
        &mut self,
        exercise: &str,
        score: i64,
        today: NaiveDate,
    ) -> Result<ScoreUpdate, ScoreError> {
        let rolled_over = self.last_updated != today;

        let today_before = if rolled_over {
            0
        } else {
            self.today_points.get(exercise).copied().unwrap_or(0)
        };
        let total_before = self.total_points.get(exercise).copied().unwrap_or(0);

        let overflow = || ScoreError::Overflow(exercise.to_string());
        let today_after = today_before.checked_add(score).ok_or_else(overflow)?;
        let total_after = total_before.checked_add(score).ok_or_else(overflow)?;

        let outcome = if rolled_over {
            self.today_points = zeroed_points();
            self.last_updated = today;
            ScoreUpdate::RolledOver
        } else {
            ScoreUpdate::Accumulated
        };

        self.today_points.insert(exercise.to_string(), today_after);
        self.total_points.insert(exercise.to_string(), total_after);

        Ok(outcome)
    }

    /// Today's points as seen on `today`: zeros if nothing was scored today.
    pub fn today_points_on(&self, today: NaiveDate) -> Points {
        if self.last_updated == today {
            self.today_points.clone()
        } else {
            zeroed_points()
        }
    }
}

/// Order rows by descending point sum, then by username.
pub fn rank_descending<T>(rows: &mut [T], points: impl Fn(&T) -> (&Points, &str)) {
    rows.sort_by(|a, b| {
        let (a_points, a_name) = points(a);
        let (b_points, b_name) = points(b);
        points_sum(b_points)
            .cmp(&points_sum(a_points))
            .then_with(|| a_name.cmp(b_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry_with_pushups(today_pushups: i64, total_pushups: i64, last: NaiveDate) -> LeaderboardEntry {
        let mut entry = LeaderboardEntry::new("a@example.com", "alice", date(2024, 1, 1));
        entry.today_points.insert("Pushups".to_string(), today_pushups);
        entry.total_points.insert("Pushups".to_string(), total_pushups);
        entry.last_updated = last;
        entry
    }

    #[test]
    fn test_new_entry_is_zeroed() {
        let entry = LeaderboardEntry::new("a@example.com", "alice", date(2024, 6, 1));
        assert_eq!(entry.total_points.len(), 4);
        assert!(entry.total_points.values().all(|&p| p == 0));
        assert_eq!(entry.today_points, zeroed_points());
        assert_eq!(entry.created_on, date(2024, 6, 1));
        assert_eq!(entry.last_updated, date(2024, 6, 1));
    }

    #[test]
    fn test_same_day_accumulates() {
        let today = date(2024, 6, 1);
        let mut entry = entry_with_pushups(5, 20, today);

        let outcome = entry.apply_score("Pushups", 3, today).unwrap();

        assert_eq!(outcome, ScoreUpdate::Accumulated);
        assert_eq!(entry.today_points["Pushups"], 8);
        assert_eq!(entry.total_points["Pushups"], 23);
        assert_eq!(entry.last_updated, today);
    }

    #[test]
    fn test_next_day_resets_today() {
        let mut entry = entry_with_pushups(5, 20, date(2024, 6, 1));
        entry.today_points.insert("Squats".to_string(), 7);

        let outcome = entry.apply_score("Pushups", 10, date(2024, 6, 2)).unwrap();

        assert_eq!(outcome, ScoreUpdate::RolledOver);
        assert_eq!(entry.today_points["Pushups"], 10);
        assert_eq!(entry.today_points["Squats"], 0);
        assert_eq!(entry.total_points["Pushups"], 30);
        assert_eq!(entry.last_updated, date(2024, 6, 2));
    }

    #[test]
    fn test_keys_stay_within_exercise_set() {
        let mut entry = LeaderboardEntry::new("a@example.com", "alice", date(2024, 6, 1));
        entry.apply_score("Bicep Curls", 4, date(2024, 6, 3)).unwrap();
        for key in entry.today_points.keys().chain(entry.total_points.keys()) {
            assert!(is_known_exercise(key), "unexpected key {key}");
        }
    }

    #[test]
    fn test_overflow_is_rejected_and_entry_unchanged() {
        let today = date(2024, 6, 1);
        let mut entry = entry_with_pushups(1, 1, today);
        let before = entry.clone();

        let result = entry.apply_score("Pushups", i64::MAX, today);

        assert_eq!(result, Err(ScoreError::Overflow("Pushups".to_string())));
        assert_eq!(entry, before);
    }

    #[test]
    fn test_overflow_in_total_after_rollover() {
        // Today's count resets on a new day, but the total still overflows.
        let mut entry = entry_with_pushups(7, i64::MAX - 2, date(2024, 6, 1));
        let before = entry.clone();

        assert!(entry.apply_score("Pushups", 5, date(2024, 6, 2)).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn test_today_points_on_stale_day() {
        let entry = entry_with_pushups(5, 20, date(2024, 6, 1));
        assert_eq!(entry.today_points_on(date(2024, 6, 1))["Pushups"], 5);
        assert_eq!(entry.today_points_on(date(2024, 6, 2)), zeroed_points());
    }

    #[test]
    fn test_is_known_exercise() {
        assert!(is_known_exercise("Bicep Curls"));
        assert!(!is_known_exercise("pushups"));
        assert!(!is_known_exercise("Burpees"));
    }

    #[test]
    fn test_rank_descending() {
        let mut low = zeroed_points();
        low.insert("Squats".to_string(), 2);
        let mut high = zeroed_points();
        high.insert("Pushups".to_string(), 9);

        let mut rows = vec![
            ("bob".to_string(), low.clone()),
            ("carol".to_string(), high),
            ("alice".to_string(), low),
        ];
        rank_descending(&mut rows, |(name, points)| (points, name.as_str()));

        let names: Vec<&str> = rows.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }
}
