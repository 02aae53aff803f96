// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::config::Config;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Not valid before (Unix timestamp)
    pub nbf: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: String,
}

/// Middleware that requires a valid bearer token.
///
/// Runs before any handler touches the database.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_jwt(token, &state.config)?;

    request.extensions_mut().insert(AuthUser {
        account_id: claims.sub,
    });

    Ok(next.run(request).await)
}

/// Create an access token for an account.
pub fn create_jwt(account_id: &str, config: &Config) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let expires = now + chrono::Duration::minutes(config.access_token_expire_minutes);

    let claims = Claims {
        sub: account_id.to_string(),
        iss: config.jwt_issuer.clone(),
        iat: now.timestamp() as usize,
        nbf: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };

    Ok(encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(&config.jwt_secret),
    )?)
}

/// Decode and validate an access token.
///
/// Any decode failure, wrong issuer, expiry, or empty subject is
/// reported as [`AppError::Unauthorized`].
pub fn verify_jwt(token: &str, config: &Config) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(&config.jwt_secret);

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AppError::Unauthorized
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(token_data.claims)
}
