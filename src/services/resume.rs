// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account-link resumption.
//!
//! After the user grants access on a source's consent screen, the backend
//! redirects to the dashboard with
//! `?initiator=data_source_auth_success&source=<id>`. The pending sync is
//! resumed once per page load, then both parameters are dropped from the
//! address.

use crate::models::DataSource;
use crate::services::session::SessionStore;
use crate::services::sync::{SyncEffect, SyncOrchestrator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const INITIATOR_PARAM: &str = "initiator";
pub const SOURCE_PARAM: &str = "source";
pub const AUTH_SUCCESS_INITIATOR: &str = "data_source_auth_success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeState {
    Idle,
    Resuming(DataSource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeResult {
    /// No marker, or an unknown source. Nothing happened.
    NotApplicable,
    /// This guard already ran for the current page load.
    AlreadyRan,
    /// The sync ran. `cleaned_url` replaces the current address.
    Resumed {
        effect: SyncEffect,
        cleaned_url: String,
    },
}

fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

/// The source to resume, if the query string carries the return marker.
pub fn pending_source(query: &str) -> Option<DataSource> {
    let query = query.trim_start_matches('?');
    let mut initiator = None;
    let mut source = None;

    for (key, value) in query_pairs(query) {
        match key.as_str() {
            INITIATOR_PARAM if initiator.is_none() => initiator = Some(value),
            SOURCE_PARAM if source.is_none() => source = Some(value),
            _ => {}
        }
    }

    if initiator.as_deref() != Some(AUTH_SUCCESS_INITIATOR) {
        return None;
    }
    source?.parse().ok()
}

/// Remove exactly `initiator` and `source` from a path-and-query, keeping
/// every other parameter in its original order and encoding.
pub fn strip_resume_params(path_and_query: &str) -> String {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, query),
        None => return path_and_query.to_string(),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = decode_component(pair.split_once('=').map_or(*pair, |(k, _)| k));
            key != INITIATOR_PARAM && key != SOURCE_PARAM
        })
        .collect();

    let path = if path.is_empty() { "/" } else { path };
    if kept.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, kept.join("&"))
    }
}

/// One-shot resumption guard. Create one per page load.
pub struct LinkResumption {
    ran: AtomicBool,
    state: Mutex<ResumeState>,
}

impl Default for LinkResumption {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkResumption {
    pub fn new() -> Self {
        Self {
            ran: AtomicBool::new(false),
            state: Mutex::new(ResumeState::Idle),
        }
    }

    pub fn state(&self) -> ResumeState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: ResumeState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Inspect `path_and_query` and resume the pending sync if marked.
    ///
    /// Waits (up to `session_wait`) for the first session resolution so the
    /// sync is never decided before the provider has answered.
    pub async fn run(
        &self,
        path_and_query: &str,
        session: &SessionStore,
        sync: &SyncOrchestrator,
        session_wait: Duration,
    ) -> ResumeResult {
        if self.ran.swap(true, Ordering::SeqCst) {
            return ResumeResult::AlreadyRan;
        }

        let query = path_and_query.split_once('?').map_or("", |(_, q)| q);
        let Some(source) = pending_source(query) else {
            return ResumeResult::NotApplicable;
        };

        self.set_state(ResumeState::Resuming(source));
        tracing::info!(%source, "Returned from source authorization, resuming sync");

        if tokio::time::timeout(session_wait, session.resolved())
            .await
            .is_err()
        {
            tracing::warn!(%source, "Session still unresolved, resuming anyway");
        }

        let effect = sync.trigger_sync(Some(source)).await;
        let cleaned_url = strip_resume_params(path_and_query);

        self.set_state(ResumeState::Idle);
        ResumeResult::Resumed {
            effect,
            cleaned_url,
        }
    }
}
