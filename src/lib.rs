// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weight-Dashboard: a client for a weight-tracking backend
//!
//! This crate holds the dashboard's state (session, goal, filter, toasts),
//! syncs data from external sources through the backend, and serves a small
//! HTTP shell that exposes that state.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use error::Result;
use services::{
    ApiClient, DashboardViews, DataChanged, FilterState, GoalStore, LocalStorage,
    SessionStore, SyncOrchestrator, Toaster,
};
use std::sync::Arc;

/// Shared application state.
///
/// Fields are owned handles; state changes only go through their methods.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub toaster: Toaster,
    pub goal: Arc<GoalStore>,
    pub filter: Arc<FilterState>,
    pub data_changed: DataChanged,
    pub sync: SyncOrchestrator,
    pub views: Arc<DashboardViews>,
}

impl AppState {
    /// Wire every service together. The session starts unresolved.
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(config.api_url());
        let session = Arc::new(SessionStore::new());
        let toaster = Toaster::new(config.toast_ttl);
        let goal = Arc::new(GoalStore::load(LocalStorage::open(config.storage_path.clone()))?);
        let filter = Arc::new(FilterState::new(toaster.clone()));
        let data_changed = DataChanged::new();

        let sync = SyncOrchestrator::new(
            api.clone(),
            Arc::clone(&session),
            toaster.clone(),
            data_changed.clone(),
            config.default_data_source,
            config.api_base_url.clone(),
        );

        let views = Arc::new(DashboardViews::new(
            api.clone(),
            Arc::clone(&session),
            Arc::clone(&goal),
            Arc::clone(&filter),
            toaster.clone(),
            data_changed.clone(),
        ));

        Ok(Self {
            config,
            api,
            session,
            toaster,
            goal,
            filter,
            data_changed,
            sync,
            views,
        })
    }
}
