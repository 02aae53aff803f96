// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Account, ExerciseEntry, LeaderboardEntry, PersonalizeRequest, Points, Profile, ProfileUpdate,
};
use crate::routes::{json_body, ApiResponse};
use crate::time_utils::{format_utc_rfc3339, today};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/personalize", post(personalize))
        .route("/api/auth/workout/recommendation", get(get_recommendation))
        .route("/api/auth/user/profile", get(get_user_profile))
        .route("/api/auth/user/workout/profile", get(get_workout_profile))
        .route("/api/auth/profile/update", patch(update_profile))
}

/// Resolve the token subject to its account.
pub(crate) async fn load_account(state: &AppState, user: &AuthUser) -> Result<Account> {
    state
        .db
        .get_account(&user.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn load_profile(state: &AppState, email: &str) -> Result<Profile> {
    state
        .db
        .get_profile(email)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

// ─── Personalization ─────────────────────────────────────────

/// Create the profile and leaderboard entry for the current account.
async fn personalize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<PersonalizeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Profile>>)> {
    let request = json_body(payload)?;
    request.validate()?;

    let account = load_account(&state, &user).await?;

    let profile = request.into_profile(&account.email, format_utc_rfc3339(chrono::Utc::now()));
    let entry = LeaderboardEntry::new(&account.email, &account.username, today());

    let created = state
        .db
        .create_profile_with_leaderboard(&profile, &entry)
        .await?;

    if !created {
        tracing::info!(account_id = %account.id, "Personalization rejected: profile exists");
        return Err(AppError::Conflict("Profile already exists".to_string()));
    }

    tracing::info!(account_id = %account.id, email = %account.email, "Profile personalized");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Profile personalized successfully", profile)),
    ))
}

// ─── Recommendation ──────────────────────────────────────────

/// Generate a workout plan, store it on the profile, and return it.
async fn get_recommendation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<ExerciseEntry>>>> {
    let account = load_account(&state, &user).await?;
    let profile = load_profile(&state, &account.email).await?;

    let plan = state.recommender.recommend_plan(&profile, today()).await?;

    // Only the plan is written; edits made while the model ran survive.
    state
        .db
        .set_profile_plan(&account.email, &plan)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Workout recommendation generated",
        plan,
    )))
}

// ─── Profile Reads ───────────────────────────────────────────

/// Basic profile with leaderboard points.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfileResponse {
    pub email: String,
    pub username: String,
    pub created_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub total_points: Points,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub today_points: Points,
}

/// Get the account summary merged with leaderboard points.
async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfileResponse>>> {
    let account = load_account(&state, &user).await?;
    let entry = state
        .db
        .get_leaderboard_entry(&account.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Leaderboard entry not found".to_string()))?;

    let today_points = entry.today_points_on(today());

    Ok(Json(ApiResponse::success(
        "User profile retrieved",
        UserProfileResponse {
            email: account.email,
            username: account.username,
            created_at: account.created_at,
            total_points: entry.total_points,
            today_points,
        },
    )))
}

/// Get the full workout profile, including the latest plan.
async fn get_workout_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Profile>>> {
    let account = load_account(&state, &user).await?;
    let profile = load_profile(&state, &account.email).await?;

    Ok(Json(ApiResponse::success(
        "Workout profile retrieved",
        profile,
    )))
}

// ─── Profile Update ──────────────────────────────────────────

/// Merge non-null fields into the stored profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Profile>>> {
    let update = json_body(payload)?;
    update.validate()?;

    let account = load_account(&state, &user).await?;
    let mut profile = load_profile(&state, &account.email).await?;

    let applied = update.apply_to(&mut profile);
    if !applied.is_empty() {
        profile = state
            .db
            .update_profile_fields(&profile, &applied)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    }

    tracing::debug!(account_id = %account.id, fields = ?applied, "Profile updated");

    Ok(Json(ApiResponse::success(
        "Profile updated successfully",
        profile,
    )))
}
