// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Posture Perfect: fitness coaching backend
//!
//! This crate provides the HTTP API for account registration, fitness
//! personalization, AI-generated workout plans, and a points leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{Notifier, RecommendationClient};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub recommender: RecommendationClient,
    /// Not used by any route yet
    pub notifier: Option<Arc<dyn Notifier>>,
}
