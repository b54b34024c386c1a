// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry and aggregate views.
//!
//! Each view caches one backend resource and refetches whenever the filter,
//! goal, session, or data-changed signal moves. Every fetch takes a
//! monotonic request token; a response whose token is no longer the latest
//! for its view is dropped instead of overwriting newer state.

use crate::error::AppError;
use crate::models::{NewWeightEntry, SummaryMetrics, WeeklyAggregate, WeightEntry};
use crate::services::api::ApiClient;
use crate::services::filter::FilterState;
use crate::services::session::SessionStore;
use crate::services::signal::DataChanged;
use crate::services::storage::GoalStore;
use crate::services::toast::Toaster;
use crate::time_utils::format_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Cached data plus its loading flag.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ViewState<T> {
    pub loading: bool,
    pub data: T,
}

/// One cached resource with its request-token counter.
struct View<T> {
    state: Mutex<ViewState<T>>,
    latest_token: AtomicU64,
}

impl<T: Clone + Default> View<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(ViewState::default()),
            latest_token: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> ViewState<T> {
        self.lock().clone()
    }

    /// Issue a new token and mark the view loading.
    fn begin(&self) -> u64 {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().loading = true;
        token
    }

    /// Store `data` if `token` is still current. Returns whether it was.
    fn finish(&self, token: u64, data: T) -> bool {
        let mut state = self.lock();
        if self.latest_token.load(Ordering::SeqCst) != token {
            return false;
        }
        state.data = data;
        state.loading = false;
        true
    }

    fn clear(&self) {
        // Invalidate anything in flight as well.
        self.latest_token.fetch_add(1, Ordering::SeqCst);
        *self.lock() = ViewState::default();
    }
}

/// The four dashboard views and the operations that mutate entries.
pub struct DashboardViews {
    api: ApiClient,
    session: Arc<SessionStore>,
    goal: Arc<GoalStore>,
    filter: Arc<FilterState>,
    toaster: Toaster,
    data_changed: DataChanged,
    daily: View<Vec<WeightEntry>>,
    weekly: View<Vec<WeeklyAggregate>>,
    summary: View<Option<SummaryMetrics>>,
    latest: View<Option<WeightEntry>>,
}

impl DashboardViews {
    pub fn new(
        api: ApiClient,
        session: Arc<SessionStore>,
        goal: Arc<GoalStore>,
        filter: Arc<FilterState>,
        toaster: Toaster,
        data_changed: DataChanged,
    ) -> Self {
        Self {
            api,
            session,
            goal,
            filter,
            toaster,
            data_changed,
            daily: View::new(),
            weekly: View::new(),
            summary: View::new(),
            latest: View::new(),
        }
    }

    pub fn daily(&self) -> ViewState<Vec<WeightEntry>> {
        self.daily.snapshot()
    }

    pub fn weekly(&self) -> ViewState<Vec<WeeklyAggregate>> {
        self.weekly.snapshot()
    }

    pub fn summary(&self) -> ViewState<Option<SummaryMetrics>> {
        self.summary.snapshot()
    }

    pub fn latest(&self) -> ViewState<Option<WeightEntry>> {
        self.latest.snapshot()
    }

    /// Token for authenticated calls; `None` clears every view.
    fn access_token(&self) -> Option<String> {
        let token = self
            .session
            .current()
            .map(|session| session.access_token().to_string());
        if token.is_none() {
            self.daily.clear();
            self.weekly.clear();
            self.summary.clear();
            self.latest.clear();
        }
        token
    }

    pub async fn refresh_all(&self) {
        tokio::join!(
            self.refresh_daily(),
            self.refresh_weekly(),
            self.refresh_summary(),
            self.refresh_latest(),
        );
    }

    pub async fn refresh_daily(&self) {
        let Some(access_token) = self.access_token() else {
            return;
        };
        let params = self.filter.selection().query_params();
        let token = self.daily.begin();

        let data = match self.api.daily_entries(&access_token, &params).await {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
                Ok(entries)
            }
            Err(e) => Err(e.user_message("Error while fetching data")),
        };
        self.settle(&self.daily, token, "daily", data);
    }

    pub async fn refresh_weekly(&self) {
        let Some(access_token) = self.access_token() else {
            return;
        };
        let mut params = self.filter.selection().query_params();
        params.push(("goal", self.goal.goal().to_string()));
        let token = self.weekly.begin();

        let (data, warning) = match self.api.weekly_aggregates(&access_token, &params).await {
            Ok(response) => (Ok(response.weekly_data), response.warning_message),
            Err(e) => (Err(e.user_message("Error while getting weekly data")), None),
        };
        if self.settle(&self.weekly, token, "weekly", data) {
            if let Some(warning) = warning {
                self.toaster.info(warning);
            }
        }
    }

    pub async fn refresh_summary(&self) {
        let Some(access_token) = self.access_token() else {
            return;
        };
        let mut params = self.filter.selection().query_params();
        params.push(("goal", self.goal.goal().to_string()));
        let token = self.summary.begin();

        let data = self
            .api
            .summary(&access_token, &params)
            .await
            .map(|response| response.metrics)
            .map_err(|e| e.user_message("Error while getting summary data"));
        self.settle(&self.summary, token, "summary", data);
    }

    pub async fn refresh_latest(&self) {
        let Some(access_token) = self.access_token() else {
            return;
        };
        let token = self.latest.begin();

        let data = self
            .api
            .latest_entry(&access_token)
            .await
            .map_err(|e| e.user_message("Error while getting latest entry"));
        self.settle(&self.latest, token, "latest", data);
    }

    /// Apply a fetch result: replace on success, clear and toast on failure.
    /// Stale results are dropped silently. Returns whether it was applied.
    fn settle<T: Clone + Default>(
        &self,
        view: &View<T>,
        token: u64,
        name: &'static str,
        result: Result<T, String>,
    ) -> bool {
        match result {
            Ok(data) => {
                let applied = view.finish(token, data);
                if !applied {
                    tracing::debug!(view = name, token, "Discarding stale response");
                }
                applied
            }
            Err(message) => {
                let applied = view.finish(token, T::default());
                if applied {
                    self.toaster.error(message);
                } else {
                    tracing::debug!(view = name, token, "Discarding stale error");
                }
                applied
            }
        }
    }

    /// Delete one daily entry. Returns whether the backend accepted it.
    pub async fn delete_entry(&self, entry_date: NaiveDate) -> bool {
        let Some(session) = self.session.current() else {
            self.toaster.error(AppError::NotSignedIn.to_string());
            return false;
        };

        match self.api.delete_entry(session.access_token(), entry_date).await {
            Ok(()) => {
                self.daily
                    .lock()
                    .data
                    .retain(|entry| entry.entry_date != entry_date);
                tracing::info!(entry_date = %entry_date, "Entry deleted");
                self.toaster
                    .success(format!("Entry deleted for {}", format_date(entry_date)));
                self.data_changed.bump();
                true
            }
            Err(e) => {
                self.toaster.error(e.user_message("Error while deleting entry"));
                false
            }
        }
    }

    /// Record a manual entry. Returns whether the backend accepted it.
    pub async fn add_entry(&self, entry: NewWeightEntry) -> bool {
        if let Err(message) = entry.check() {
            self.toaster.error(message);
            return false;
        }
        let Some(session) = self.session.current() else {
            self.toaster.error(AppError::NotSignedIn.to_string());
            return false;
        };

        match self.api.add_entry(session.access_token(), &entry).await {
            Ok(()) => {
                tracing::info!(entry_date = %entry.entry_date, "Entry added");
                self.toaster
                    .success(format!("Entry added for {}", format_date(entry.entry_date)));
                self.data_changed.bump();
                true
            }
            Err(e) => {
                self.toaster.error(e.user_message("Error while adding entry"));
                false
            }
        }
    }

    /// Refetch everything now and again on every dependency change.
    ///
    /// Each round runs in its own task so a slow response never delays the
    /// next round; the request tokens decide which answer wins.
    pub fn spawn_refetch_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let views = Arc::clone(self);
        let mut filter_rx = views.filter.subscribe();
        let mut goal_rx = views.goal.subscribe();
        let mut session_rx = views.session.subscribe();
        let mut data_rx = views.data_changed.subscribe();

        tokio::spawn(async move {
            loop {
                let round = Arc::clone(&views);
                tokio::spawn(async move { round.refresh_all().await });

                let changed = tokio::select! {
                    r = filter_rx.changed() => r,
                    r = goal_rx.changed() => r,
                    r = session_rx.changed() => r,
                    r = data_rx.changed() => r,
                };
                if changed.is_err() {
                    tracing::debug!("Dependency channel closed, stopping refetch loop");
                    break;
                }
                // One round covers every change seen so far.
                let _ = filter_rx.borrow_and_update();
                let _ = goal_rx.borrow_and_update();
                let _ = session_rx.borrow_and_update();
                let _ = data_rx.borrow_and_update();
            }
        })
    }
}
