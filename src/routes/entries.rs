// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual entry creation and deletion.

use crate::error::{AppError, Result};
use crate::models::NewWeightEntry;
use crate::routes::dashboard::change_response;
use crate::time_utils::parse_date;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{delete, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/entries", post(add_entry))
        .route("/api/entries/{entry_date}", delete(delete_entry))
}

async fn add_entry(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewWeightEntry>,
) -> Response {
    let accepted = state.views.add_entry(entry).await;
    change_response(&state, accepted)
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(entry_date): Path<String>,
) -> Result<Response> {
    let entry_date = parse_date(&entry_date)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date: '{}'", entry_date)))?;

    let accepted = state.views.delete_entry(entry_date).await;
    Ok(change_response(&state, accepted))
}
