// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual "Sync Data" trigger.

use crate::models::DataSource;
use crate::routes::dashboard::DashboardSnapshot;
use crate::services::SyncEffect;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/sync", post(trigger_sync))
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    /// Falls back to the configured default source
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

/// Run one sync. A source that needs linking answers with a redirect to its
/// consent screen; every other outcome is reported through the toast.
async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    request: Option<Json<SyncRequest>>,
) -> Response {
    let Json(request) = request.unwrap_or_default();

    match state.sync.trigger_sync(request.data_source).await {
        SyncEffect::Navigate(target) => Redirect::to(&target).into_response(),
        SyncEffect::Notified => Json(DashboardSnapshot::capture(&state)).into_response(),
    }
}
