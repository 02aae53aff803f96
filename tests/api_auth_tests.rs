// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject missing, malformed, and expired tokens with 401
//! 2. Rejection happens before any database access
//! 3. Valid tokens get past authentication
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use posture_perfect::config::Config;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, create_test_jwt, empty_request, json_request};

const PROTECTED: [(&str, &str); 7] = [
    ("POST", "/api/auth/personalize"),
    ("GET", "/api/auth/workout/recommendation"),
    ("GET", "/api/auth/user/profile"),
    ("GET", "/api/auth/user/workout/profile"),
    ("PATCH", "/api/auth/profile/update"),
    ("GET", "/api/auth/leaderboard"),
    ("PATCH", "/api/auth/leaderboard/update"),
];

#[tokio::test]
async fn test_protected_routes_without_token() {
    for (method, uri) in PROTECTED {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(json_request(method, uri, None, serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn test_protected_route_with_malformed_token() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(empty_request(
            "GET",
            "/api/auth/user/profile",
            Some("invalid.token.here"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_non_bearer_scheme() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("acct-1", &state.config);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/leaderboard")
                .header(header::AUTHORIZATION, format!("Basic {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected_before_store_access() {
    let (app, _) = create_test_app();

    let mut expired_config = Config::test_default();
    expired_config.access_token_expire_minutes = -5;
    let token = create_test_jwt("acct-1", &expired_config);

    for (method, uri) in PROTECTED {
        let response = app
            .clone()
            .oneshot(json_request(method, uri, Some(&token), serde_json::json!({})))
            .await
            .unwrap();

        // The offline store would answer 500; 401 means it was never reached.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let (app, _) = create_test_app();

    let mut other = Config::test_default();
    other.jwt_secret = b"some_other_secret_32_bytes_long!".to_vec();
    let token = create_test_jwt("acct-1", &other);

    let response = app
        .oneshot(empty_request("GET", "/api/auth/leaderboard", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, state) = create_test_app();
    let token = create_test_jwt("acct-1", &state.config);

    let response = app
        .oneshot(empty_request("GET", "/api/auth/leaderboard", Some(&token)))
        .await
        .unwrap();

    // Authentication passes; the offline store then fails.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Database error");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/auth/leaderboard/update")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_routes_no_auth_required() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Welcome to the Posture Perfect");

    let response = app
        .oneshot(empty_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_check_connection_reports_store_failure() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/api/check/connection", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], "error");
}
