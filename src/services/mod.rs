// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - dashboard state and backend orchestration.

pub mod api;
pub mod filter;
pub mod resume;
pub mod session;
pub mod signal;
pub mod storage;
pub mod sync;
pub mod toast;
pub mod views;

pub use api::ApiClient;
pub use filter::{FilterMode, FilterSelection, FilterState};
pub use resume::{LinkResumption, ResumeResult, ResumeState};
pub use session::{Session, SessionState, SessionStore, User};
pub use signal::DataChanged;
pub use storage::{GoalStore, LocalStorage};
pub use sync::{SyncEffect, SyncOrchestrator, SyncOutcome};
pub use toast::{ToastCategory, ToastMessage, Toaster};
pub use views::{DashboardViews, ViewState};
