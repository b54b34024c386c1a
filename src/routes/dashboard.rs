// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Landing page, dashboard snapshot, goal and filter routes.

use crate::error::{AppError, Result};
use crate::models::{
    Goal, SourceOption, SummaryCards, SummaryMetrics, WeeklyAggregate, WeightEntry,
};
use crate::services::{
    FilterMode, FilterSelection, LinkResumption, ResumeResult, SyncEffect, ToastMessage, User,
    ViewState,
};
use crate::AppState;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/goal", put(put_goal))
        .route("/api/filter", axum::routing::delete(reset_filter))
        .route("/api/filter/mode", post(switch_filter_mode))
        .route("/api/filter/weeks", put(put_weeks_limit))
        .route("/api/filter/dates", put(put_dates))
}

// ─── Snapshot ────────────────────────────────────────────────

/// Everything the dashboard renders, as of this instant.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardSnapshot {
    pub user: Option<User>,
    pub goal: Goal,
    pub goal_label: String,
    pub filter: FilterSelection,
    pub heading: String,
    pub toast: Option<ToastMessage>,
    pub daily: ViewState<Vec<WeightEntry>>,
    pub weekly: ViewState<Vec<WeeklyAggregate>>,
    pub summary: ViewState<Option<SummaryMetrics>>,
    pub summary_cards: Option<SummaryCards>,
    pub latest: ViewState<Option<WeightEntry>>,
    pub sync_in_progress: bool,
    pub sources: Vec<SourceOption>,
}

impl DashboardSnapshot {
    pub fn capture(state: &AppState) -> Self {
        let goal = state.goal.goal();
        let filter = state.filter.selection();
        let summary = state.views.summary();
        Self {
            user: state.session.current().map(|session| session.user),
            goal,
            goal_label: goal.label().to_string(),
            heading: filter.heading(),
            filter,
            toast: state.toaster.current(),
            daily: state.views.daily(),
            weekly: state.views.weekly(),
            summary_cards: summary.data.as_ref().map(SummaryMetrics::cards),
            summary,
            latest: state.views.latest(),
            sync_in_progress: state.sync.in_progress(),
            sources: SourceOption::all(),
        }
    }
}

/// Snapshot with 200 when a change was accepted, 422 when it was rejected.
/// The rejection reason is in the snapshot's toast.
pub(crate) fn change_response(state: &AppState, accepted: bool) -> Response {
    let status = if accepted {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(DashboardSnapshot::capture(state))).into_response()
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(DashboardSnapshot::capture(&state))
}

// ─── Landing ─────────────────────────────────────────────────

/// Dashboard entry point. Also where the backend sends the browser back
/// after a data source's consent screen.
async fn landing(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    // One guard per page load.
    let resumption = LinkResumption::new();
    let result = resumption
        .run(
            path_and_query,
            &state.session,
            &state.sync,
            state.config.session_wait,
        )
        .await;

    match result {
        ResumeResult::Resumed {
            effect: SyncEffect::Navigate(target),
            ..
        } => Redirect::to(&target).into_response(),
        // Drops the marker from the address bar.
        ResumeResult::Resumed { cleaned_url, .. } => Redirect::to(&cleaned_url).into_response(),
        ResumeResult::NotApplicable | ResumeResult::AlreadyRan => {
            Json(DashboardSnapshot::capture(&state)).into_response()
        }
    }
}

// ─── Goal ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
}

async fn put_goal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<DashboardSnapshot>> {
    let goal: Goal = request.goal.trim().parse()?;
    state.goal.set_goal(goal)?;
    Ok(Json(DashboardSnapshot::capture(&state)))
}

// ─── Filter ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: FilterMode,
}

#[derive(Debug, Deserialize)]
pub struct WeeksRequest {
    /// A number, a numeric string, or null/empty for "no limit"
    #[serde(default)]
    pub weeks_limit: Value,
}

#[derive(Debug, Deserialize)]
pub struct DatesRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

async fn reset_filter(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    state.filter.reset();
    Json(DashboardSnapshot::capture(&state))
}

async fn switch_filter_mode(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Json<DashboardSnapshot> {
    state.filter.switch_mode(request.mode);
    Json(DashboardSnapshot::capture(&state))
}

async fn put_weeks_limit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeeksRequest>,
) -> Result<Response> {
    let raw = match request.weeks_limit {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        other => {
            return Err(AppError::BadRequest(format!(
                "weeks_limit must be a number, got {}",
                other
            )))
        }
    };
    let accepted = state.filter.set_weeks_limit(&raw);
    Ok(change_response(&state, accepted))
}

async fn put_dates(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DatesRequest>,
) -> Response {
    let accepted = state
        .filter
        .set_dates(request.date_from.as_deref(), request.date_to.as_deref());
    change_response(&state, accepted)
}
