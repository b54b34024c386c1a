// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-slot toast register.
//!
//! At most one toast is live. Showing a new one replaces the current message
//! and restarts the expiry timer; the previous timer becomes a no-op.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ToastCategory {
    Info,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToastMessage {
    pub category: ToastCategory,
    pub message: String,
}

struct Slot {
    ttl: Duration,
    current: watch::Sender<Option<ToastMessage>>,
    /// Bumped on every `show`; an expiry timer only clears its own toast.
    generation: AtomicU64,
}

/// Cheap-to-clone handle to the shared toast slot.
#[derive(Clone)]
pub struct Toaster {
    slot: Arc<Slot>,
}

impl Toaster {
    pub fn new(ttl: Duration) -> Self {
        let (current, _rx) = watch::channel(None);
        Self {
            slot: Arc::new(Slot {
                ttl,
                current,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn show(&self, category: ToastCategory, message: impl Into<String>) {
        let message = message.into();
        let generation = self.slot.generation.fetch_add(1, Ordering::SeqCst) + 1;

        match category {
            ToastCategory::Error => tracing::warn!(%message, "Error toast"),
            _ => tracing::debug!(?category, %message, "Toast"),
        }

        self.slot
            .current
            .send_replace(Some(ToastMessage { category, message }));

        // Outside a runtime the toast simply stays until replaced.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let slot = Arc::clone(&self.slot);
            handle.spawn(async move {
                tokio::time::sleep(slot.ttl).await;
                slot.current.send_if_modified(|current| {
                    if slot.generation.load(Ordering::SeqCst) != generation || current.is_none() {
                        return false;
                    }
                    *current = None;
                    true
                });
            });
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastCategory::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastCategory::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastCategory::Success, message);
    }

    /// The live toast, if it has not expired.
    pub fn current(&self) -> Option<ToastMessage> {
        self.slot.current.borrow().clone()
    }

    /// Number of toasts shown since creation.
    pub fn shown_count(&self) -> u64 {
        self.slot.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ToastMessage>> {
        self.slot.current.subscribe()
    }
}
