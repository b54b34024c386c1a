// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable client-side storage.
//!
//! A small JSON key/value file playing the role of browser local storage.
//! The goal selection is the only value the dashboard persists.

use crate::error::Result;
use crate::models::Goal;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;

/// Storage key for the selected goal.
pub const GOAL_KEY: &str = "goalSelected";

/// File-backed string key/value store. Every `set` rewrites the file.
pub struct LocalStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open the store, starting empty if the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt storage file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Write `key` to disk, then to memory. A failed write changes nothing.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.lock();
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(values).context("encoding storage")?;

        // Write-then-rename.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// The user's goal, persisted on every change and observable by views.
pub struct GoalStore {
    storage: LocalStorage,
    tx: watch::Sender<Goal>,
}

impl GoalStore {
    /// Read the stored goal (default when absent or invalid) and write it back.
    pub fn load(storage: LocalStorage) -> Result<Self> {
        let goal = storage
            .get(GOAL_KEY)
            .and_then(|raw| raw.parse::<Goal>().ok())
            .unwrap_or_default();
        storage.set(GOAL_KEY, goal.as_str())?;

        tracing::debug!(%goal, path = %storage.path().display(), "Goal loaded");
        let (tx, _rx) = watch::channel(goal);
        Ok(Self { storage, tx })
    }

    pub fn goal(&self) -> Goal {
        *self.tx.borrow()
    }

    pub fn set_goal(&self, goal: Goal) -> Result<()> {
        self.storage.set(GOAL_KEY, goal.as_str())?;
        self.tx.send_if_modified(|current| {
            let changed = *current != goal;
            *current = goal;
            changed
        });
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Goal> {
        self.tx.subscribe()
    }
}
