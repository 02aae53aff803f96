// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use posture_perfect::config::Config;
use posture_perfect::db::FirestoreDb;
use posture_perfect::middleware::auth::create_jwt;
use posture_perfect::routes::create_router;
use posture_perfect::services::RecommendationClient;
use posture_perfect::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build a router around the given config and database.
#[allow(dead_code)]
pub fn create_app(config: Config, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let recommender = RecommendationClient::new(&config).expect("recommendation client");

    let state = Arc::new(AppState {
        config,
        db,
        recommender,
        notifier: None,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an offline database.
///
/// Every store access fails with a 500, so any other status proves the
/// request was decided before reaching the database.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app(Config::test_default(), FirestoreDb::new_mock())
}

/// Create a valid access token for `account_id`.
#[allow(dead_code)]
pub fn create_test_jwt(account_id: &str, config: &Config) -> String {
    create_jwt(account_id, config).expect("Failed to create JWT")
}

/// JSON request with an optional bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Bodiless request with an optional bearer token.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
