// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store wrapping the identity provider's session.
//!
//! The provider owns the session; the dashboard only holds a read-only copy
//! and tells listeners whenever it is created, refreshed, or cleared.

use crate::error::AppError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

/// Credential bundle attached to every backend request.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Provider access-token claims we care about.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: User) -> Self {
        Self {
            access_token: access_token.into(),
            user,
        }
    }

    /// Build a session from a provider-issued JWT access token.
    ///
    /// The signature is not checked here; the backend verifies every token
    /// it receives. Only `sub` and `email` are read.
    pub fn from_access_token(token: &str) -> Result<Self, AppError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<ProviderClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| AppError::BadRequest(format!("Invalid access token: {}", e)))?;

        Ok(Self::new(
            token,
            User {
                id: data.claims.sub,
                email: data.claims.email,
            },
        ))
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Observable session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The provider has not answered yet
    #[default]
    Unresolved,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Holds the current session and notifies subscribers on every change.
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Unresolved);
        Self { tx }
    }

    /// Login callback or token refresh.
    pub fn sign_in(&self, session: Session) {
        tracing::info!(user_id = %session.user.id, "Session established");
        self.tx.send_replace(SessionState::SignedIn(session));
    }

    /// Logout, or the provider resolved without a session.
    pub fn sign_out(&self) {
        let previous = self.tx.send_replace(SessionState::SignedOut);
        if let SessionState::SignedIn(session) = previous {
            tracing::info!(user_id = %session.user.id, "Session cleared");
        }
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().session().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Wait for the first resolution (signed in or signed out).
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.tx.subscribe();
        let result = rx
            .wait_for(|state| !matches!(state, SessionState::Unresolved))
            .await
            .map(|state| (*state).clone());
        // The sender lives as long as `self`, so the channel cannot close here.
        result.unwrap_or(SessionState::SignedOut)
    }
}
