// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use crate::models::DataSource;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, e.g. `http://localhost:5040`. OAuth redirect paths
    /// returned by the backend are joined onto this.
    pub api_base_url: String,
    /// Path prefix for the REST routes (`api` → `{base}/api/...`)
    pub api_prefix: String,
    /// Dashboard shell port
    pub port: u16,
    /// Source used when a sync is requested without one
    pub default_data_source: DataSource,
    /// Durable key/value file (goal selection lives here)
    pub storage_path: PathBuf,
    /// How long a toast stays visible
    pub toast_ttl: Duration,
    /// Upper bound on waiting for the first session resolution
    pub session_wait: Duration,
    /// Optional provider access token used to sign in at startup
    pub access_token: Option<String>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5040".to_string(),
            api_prefix: "api".to_string(),
            port: 5173,
            default_data_source: DataSource::Gfit,
            storage_path: env::temp_dir().join("weight-dashboard-test-storage.json"),
            toast_ttl: Duration::from_millis(2000),
            session_wait: Duration::from_secs(1),
            access_token: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_data_source = match env::var("DEFAULT_DATA_SOURCE") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("DEFAULT_DATA_SOURCE", raw))?,
            Err(_) => DataSource::Gfit,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("API_BASE_URL"))?,
            api_prefix: env::var("API_PREFIX")
                .map(|v| v.trim().trim_matches('/').to_string())
                .unwrap_or_else(|_| "api".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5173".to_string())
                .parse()
                .unwrap_or(5173),
            default_data_source,
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".weight-dashboard/storage.json")),
            toast_ttl: Duration::from_millis(parse_or("TOAST_TTL_MS", 2000)),
            session_wait: Duration::from_secs(parse_or("SESSION_WAIT_SECS", 10)),
            access_token: env::var("ACCESS_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Base URL of the REST routes: origin plus prefix.
    pub fn api_url(&self) -> String {
        if self.api_prefix.is_empty() {
            self.api_base_url.clone()
        } else {
            format!("{}/{}", self.api_base_url, self.api_prefix)
        }
    }
}

fn parse_or(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
