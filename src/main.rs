// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight-Dashboard shell
//!
//! Serves the dashboard state over HTTP, keeps the entry and aggregate views
//! fresh, and resumes pending data syncs after source authorization.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weight_dashboard::{config::Config, services::Session, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        api = %config.api_url(),
        "Starting Weight-Dashboard"
    );

    let state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(
        path = %config.storage_path.display(),
        goal = %state.goal.goal(),
        "Goal loaded"
    );

    // Resolve the session before anything waits on it
    match config.access_token.as_deref() {
        Some(token) => match Session::from_access_token(token) {
            Ok(session) => state.session.sign_in(session),
            Err(e) => {
                tracing::warn!(error = %e, "ACCESS_TOKEN rejected, starting signed out");
                state.session.sign_out();
            }
        },
        None => state.session.sign_out(),
    }

    // Views refetch on every filter, goal, session, or data change
    let _refetch = state.views.spawn_refetch_loop();

    // Build router
    let app = weight_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let mut filter = EnvFilter::from_default_env();
    for directive in ["weight_dashboard=debug", "info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry().with(filter).with(format).init();
}
