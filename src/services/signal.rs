// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! "Data changed" signal shared by everything that mutates backend data.

use std::sync::Arc;
use tokio::sync::watch;

/// Monotonic counter; every bump makes all views refetch.
#[derive(Clone)]
pub struct DataChanged {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for DataChanged {
    fn default() -> Self {
        Self::new()
    }
}

impl DataChanged {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn bump(&self) {
        self.tx.send_modify(|count| *count += 1);
        tracing::debug!(version = *self.tx.borrow(), "Data changed");
    }

    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
