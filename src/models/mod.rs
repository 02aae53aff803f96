// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod account;
pub mod leaderboard;
pub mod plan;
pub mod profile;

pub use account::Account;
pub use leaderboard::{LeaderboardEntry, Points, ScoreError, ScoreUpdate, EXERCISES};
pub use plan::{ExerciseEntry, PlanError};
pub use profile::{PersonalizeRequest, Profile, ProfileUpdate};
