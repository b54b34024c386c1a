// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Must be signed in to get data")]
    NotSignedIn,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Non-2xx answer from the backend, message already extracted.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text shown to the user in an error toast.
    ///
    /// Backend messages are passed through verbatim; transport failures fall
    /// back to the endpoint-specific `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::NotSignedIn | AppError::BadRequest(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Best-effort extraction of an error message from a backend error body.
///
/// Preference order is `message`, `detail` (a string, or the first `msg` of
/// a validation error list), then `error_message`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    match body.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            if let Some(msg) = items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
            {
                return Some(msg.to_string());
            }
        }
        _ => {}
    }

    body.get("error_message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotSignedIn => (
                StatusCode::UNAUTHORIZED,
                "not_signed_in",
                Some(self.to_string()),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Api { message, .. } => {
                (StatusCode::BAD_GATEWAY, "backend_error", Some(message.clone()))
            }
            AppError::Http(err) => {
                tracing::error!(error = %err, "Backend request failed");
                (StatusCode::BAD_GATEWAY, "backend_unreachable", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = format!("{:#}", err), "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and services
pub type Result<T> = std::result::Result<T, AppError>;
