// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data-sync orchestrator.
//!
//! Asks the backend to pull data from an external source and turns the
//! answer into exactly one user-visible effect: a navigation to the source's
//! consent screen, or a toast (plus a data-changed bump on success).

use crate::error::{extract_error_message, AppError};
use crate::models::DataSource;
use crate::services::api::{ApiClient, SyncReply};
use crate::services::session::SessionStore;
use crate::services::signal::DataChanged;
use crate::services::toast::Toaster;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const SYNC_FAILED: &str = "Error while syncing data";

/// Non-error statuses that carry a message and need no refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoStatus {
    DataUpToDate,
    NoDataReceived,
    NoNewData,
}

impl InfoStatus {
    /// Shown when the backend sends no message of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            InfoStatus::DataUpToDate => "Data is already up to date",
            InfoStatus::NoDataReceived => "No data received from source",
            InfoStatus::NoNewData => "No new data to sync",
        }
    }
}

/// Closed interpretation of a `sync-data` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The source must be (re)linked; `auth_url` is a backend-relative path.
    AuthNeeded { auth_url: String },
    Synced { new_entries_count: u64 },
    Info { status: InfoStatus, message: String },
    Failed { message: String },
}

impl SyncOutcome {
    /// Interpret an HTTP status plus JSON body.
    pub fn from_reply(status: StatusCode, body: &Value) -> Self {
        let message = || extract_error_message(body).unwrap_or_else(|| SYNC_FAILED.to_string());

        if status == StatusCode::UNAUTHORIZED {
            return match body.get("auth_url").and_then(Value::as_str) {
                Some(auth_url) => SyncOutcome::AuthNeeded {
                    auth_url: auth_url.to_string(),
                },
                None => SyncOutcome::Failed { message: message() },
            };
        }

        if !status.is_success() {
            return SyncOutcome::Failed { message: message() };
        }

        let info = |status: InfoStatus| SyncOutcome::Info {
            status,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(status.default_message())
                .to_string(),
        };

        match body.get("status").and_then(Value::as_str) {
            // A success without a count is malformed, not "0 new entries".
            Some("sync_success") => match body.get("new_entries_count").and_then(Value::as_u64) {
                Some(new_entries_count) => SyncOutcome::Synced { new_entries_count },
                None => SyncOutcome::Failed {
                    message: SYNC_FAILED.to_string(),
                },
            },
            Some("data_up_to_date") => info(InfoStatus::DataUpToDate),
            Some("no_data_received") => info(InfoStatus::NoDataReceived),
            Some("no_new_data") => info(InfoStatus::NoNewData),
            // Older backends answer 200 with the redirect in the body.
            Some("auth_needed") => match body.get("auth_url").and_then(Value::as_str) {
                Some(auth_url) => SyncOutcome::AuthNeeded {
                    auth_url: auth_url.to_string(),
                },
                None => SyncOutcome::Failed { message: message() },
            },
            _ => SyncOutcome::Failed { message: message() },
        }
    }
}

/// What the caller must do after a sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEffect {
    /// Full page navigation to this absolute URL. No toast was shown.
    Navigate(String),
    /// The result was surfaced as a toast.
    Notified,
}

/// "1 new entry" / "N new entries".
pub fn new_entries_phrase(count: u64) -> String {
    if count == 1 {
        "1 new entry".to_string()
    } else {
        format!("{} new entries", count)
    }
}

#[derive(Clone)]
pub struct SyncOrchestrator {
    api: ApiClient,
    session: Arc<SessionStore>,
    toaster: Toaster,
    data_changed: DataChanged,
    default_source: DataSource,
    /// Backend origin that relative `auth_url` paths are joined onto
    backend_origin: String,
    in_flight: Arc<AtomicBool>,
}

/// Clears the single-flight flag however the sync ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncOrchestrator {
    pub fn new(
        api: ApiClient,
        session: Arc<SessionStore>,
        toaster: Toaster,
        data_changed: DataChanged,
        default_source: DataSource,
        backend_origin: impl Into<String>,
    ) -> Self {
        Self {
            api,
            session,
            toaster,
            data_changed,
            default_source,
            backend_origin: backend_origin.into().trim_end_matches('/').to_string(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Sync `source` (or the default source). Never fails; every problem
    /// ends up in a single error toast.
    pub async fn trigger_sync(&self, source: Option<DataSource>) -> SyncEffect {
        let source = source.unwrap_or(self.default_source);

        let Some(session) = self.session.current() else {
            self.toaster.error(AppError::NotSignedIn.to_string());
            return SyncEffect::Notified;
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.toaster.info("Sync already in progress");
            return SyncEffect::Notified;
        }
        let _guard = InFlightGuard(&self.in_flight);

        tracing::info!(%source, user_id = %session.user.id, "Starting data sync");

        let outcome = match self.api.sync_data(session.access_token(), source).await {
            Ok(SyncReply { status, body }) => SyncOutcome::from_reply(status, &body),
            Err(e) => {
                tracing::warn!(%source, error = %e, "Sync request failed");
                SyncOutcome::Failed {
                    message: e.user_message(SYNC_FAILED),
                }
            }
        };

        self.apply(source, outcome)
    }

    fn apply(&self, source: DataSource, outcome: SyncOutcome) -> SyncEffect {
        match outcome {
            SyncOutcome::AuthNeeded { auth_url } => {
                let target = format!("{}{}", self.backend_origin, auth_url);
                // The target ends up in a Location header.
                if HeaderValue::from_str(&target).is_err() {
                    tracing::warn!(%source, ?auth_url, "Unusable authorization URL");
                    self.toaster.error(SYNC_FAILED);
                    return SyncEffect::Notified;
                }
                tracing::info!(%source, %target, "Source needs authorization, navigating");
                SyncEffect::Navigate(target)
            }
            SyncOutcome::Synced { new_entries_count } => {
                tracing::info!(%source, new_entries_count, "Sync complete");
                self.toaster
                    .success(format!("Synced {}", new_entries_phrase(new_entries_count)));
                self.data_changed.bump();
                SyncEffect::Notified
            }
            SyncOutcome::Info { status, message } => {
                tracing::info!(%source, ?status, "Sync finished without new data");
                self.toaster.info(message);
                SyncEffect::Notified
            }
            SyncOutcome::Failed { message } => {
                self.toaster.error(message);
                SyncEffect::Notified
            }
        }
    }
}
