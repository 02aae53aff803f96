// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Posture Perfect API Server
//!
//! Fitness coaching backend: accounts, personalization, AI workout plans,
//! and a points leaderboard.

use posture_perfect::{
    config::Config,
    db::FirestoreDb,
    services::{LogNotifier, Notifier, RecommendationClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Posture Perfect API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let recommender = RecommendationClient::new(&config)?;
    tracing::info!(
        model = %config.llm_model,
        timeout_secs = config.llm_timeout_secs,
        "Recommendation client initialized"
    );

    let notifier: Option<Arc<dyn Notifier>> = if config.mail_notifications {
        tracing::info!("Mail notifications enabled (log only)");
        Some(Arc::new(LogNotifier))
    } else {
        None
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        recommender,
        notifier,
    });

    // Build router
    let app = posture_perfect::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("posture_perfect=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
