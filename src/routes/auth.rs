// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::Account;
use crate::routes::{json_body, ApiResponse};
use crate::services::password::{hash_password, verify_password};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

const MISSING_FIELDS: &str = "Please provide all required fields";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Trimmed, lowercased email; `None` if blank.
fn normalize_email(raw: Option<String>) -> Option<String> {
    raw.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty())
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// Register a new account.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    let mut request = json_body(payload)?;
    request.email = normalize_email(request.email);
    request.validate()?;

    let (Some(email), Some(username), Some(password)) = (
        request.email,
        non_blank(request.username),
        non_blank(request.password),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    if state.db.find_account_by_email(&email).await?.is_some() {
        tracing::info!(email = %email, "Registration rejected: email already registered");
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    // bcrypt is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))??;

    let account = Account {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        username: username.trim().to_string(),
        password_hash,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };

    // The pre-check above is only a fast path; the reservation is authoritative.
    if !state.db.create_account(&account).await? {
        tracing::info!(email = %account.email, "Registration rejected: email reserved concurrently");
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    tracing::info!(account_id = %account.id, email = %account.email, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Login response payload.
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange credentials for an access token.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenResponse>>> {
    let request = json_body(payload)?;

    let (Some(email), Some(password)) = (
        normalize_email(request.email),
        non_blank(request.password),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    // Unknown email and wrong password look identical to the caller.
    let Some(account) = state.db.find_account_by_email(&email).await? else {
        tracing::info!(email = %email, "Login failed: unknown email");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    let stored_hash = account.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Verification task failed: {}", e)))?;

    if !matches {
        tracing::info!(account_id = %account.id, "Login failed: password mismatch");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = create_jwt(&account.id, &state.config)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(account_id = %account.id, "Login successful");

    Ok(Json(ApiResponse::success(
        "Login successful",
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        },
    )))
}
