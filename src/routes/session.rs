// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session hand-off from the identity provider.

use crate::error::Result;
use crate::routes::dashboard::DashboardSnapshot;
use crate::services::Session;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", post(sign_in).delete(sign_out))
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub access_token: String,
}

/// Adopt a provider access token as the current session.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<DashboardSnapshot>> {
    let session = Session::from_access_token(request.access_token.trim())?;
    state.session.sign_in(session);
    Ok(Json(DashboardSnapshot::capture(&state)))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    state.session.sign_out();
    Json(DashboardSnapshot::capture(&state))
}
