// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::leaderboard::{is_known_exercise, rank_descending, MAX_SCORE};
use crate::models::{LeaderboardEntry, Points, EXERCISES};
use crate::routes::profile::load_account;
use crate::routes::{json_body, ApiResponse};
use crate::time_utils::today;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/leaderboard", get(get_leaderboard))
        .route("/api/auth/leaderboard/update", patch(update_leaderboard))
}

// ─── Rankings ────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OverallRow {
    pub username: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub total_points: Points,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TodayRow {
    pub username: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub today_points: Points,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub overall_leaderboard: Vec<OverallRow>,
    pub today_leaderboard: Vec<TodayRow>,
}

/// Build both rankings, highest point sum first.
pub fn build_leaderboard(
    all: Vec<LeaderboardEntry>,
    scored_today: Vec<LeaderboardEntry>,
) -> LeaderboardResponse {
    let mut overall_leaderboard: Vec<OverallRow> = all
        .into_iter()
        .map(|e| OverallRow {
            username: e.username,
            total_points: e.total_points,
        })
        .collect();
    rank_descending(&mut overall_leaderboard, |row| {
        (&row.total_points, row.username.as_str())
    });

    let mut today_leaderboard: Vec<TodayRow> = scored_today
        .into_iter()
        .map(|e| TodayRow {
            username: e.username,
            today_points: e.today_points,
        })
        .collect();
    rank_descending(&mut today_leaderboard, |row| {
        (&row.today_points, row.username.as_str())
    });

    LeaderboardResponse {
        overall_leaderboard,
        today_leaderboard,
    }
}

/// All-time and today's rankings.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<LeaderboardResponse>>> {
    let (all, scored_today) = tokio::try_join!(
        state.db.list_leaderboard(),
        state.db.list_leaderboard_updated_on(today()),
    )?;

    tracing::debug!(
        entries = all.len(),
        scored_today = scored_today.len(),
        "Leaderboard fetched"
    );

    Ok(Json(ApiResponse::success(
        "Leaderboard retrieved",
        build_leaderboard(all, scored_today),
    )))
}

// ─── Score Update ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct ScoreRequest {
    exercise: String,
    #[validate(range(
        min = 0,
        max = MAX_SCORE,
        message = "score must be between 0 and 100000"
    ))]
    score: i64,
}

/// Add points for one exercise to the current account.
async fn update_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LeaderboardEntry>>> {
    let request = json_body(payload)?;
    request.validate()?;

    if !is_known_exercise(&request.exercise) {
        return Err(AppError::BadRequest(format!(
            "Unknown exercise '{}'; expected one of: {}",
            request.exercise,
            EXERCISES.join(", ")
        )));
    }

    let account = load_account(&state, &user).await?;
    let mut entry = state
        .db
        .get_leaderboard_entry(&account.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Leaderboard entry not found".to_string()))?;

    let outcome = entry
        .apply_score(&request.exercise, request.score, today())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    state.db.set_leaderboard_entry(&entry).await?;

    tracing::info!(
        account_id = %account.id,
        exercise = %request.exercise,
        score = request.score,
        ?outcome,
        "Leaderboard updated"
    );

    Ok(Json(ApiResponse::success("Leaderboard updated", entry)))
}
