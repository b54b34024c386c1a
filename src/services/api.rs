// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight-tracker backend client.
//!
//! Handles:
//! - Bearer token attachment on every route
//! - Filter query parameters for the table/summary routes
//! - Error message extraction from non-2xx bodies
//!
//! `sync-data` is special: its status codes are part of the contract, so it
//! returns the raw status and body for the sync orchestrator to interpret.

use crate::error::{extract_error_message, AppError};
use crate::models::{
    DataSource, NewWeightEntry, SummaryResponse, WeeklyAggregateResponse, WeightEntry,
};
use crate::time_utils::format_date;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Query parameters as built by the filter state.
pub type QueryParams = [(&'static str, String)];

/// Raw `sync-data` answer.
#[derive(Debug, Clone)]
pub struct SyncReply {
    pub status: StatusCode,
    /// `Value::Null` when the body was empty or not JSON
    pub body: Value,
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Origin plus route prefix, e.g. `http://localhost:5040/api`
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask the backend to pull fresh data from an external source.
    pub async fn sync_data(
        &self,
        access_token: &str,
        source: DataSource,
    ) -> Result<SyncReply, AppError> {
        let url = format!("{}/sync-data", self.base_url);
        tracing::debug!(%source, "Requesting data sync");

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "data_source": source }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(SyncReply { status, body })
    }

    pub async fn daily_entries(
        &self,
        access_token: &str,
        params: &QueryParams,
    ) -> Result<Vec<WeightEntry>, AppError> {
        self.get_json("daily-entries", access_token, params, "Error while fetching data")
            .await
    }

    pub async fn weekly_aggregates(
        &self,
        access_token: &str,
        params: &QueryParams,
    ) -> Result<WeeklyAggregateResponse, AppError> {
        self.get_json(
            "weekly-aggregates",
            access_token,
            params,
            "Error while getting weekly data",
        )
        .await
    }

    pub async fn summary(
        &self,
        access_token: &str,
        params: &QueryParams,
    ) -> Result<SummaryResponse, AppError> {
        self.get_json(
            "summary",
            access_token,
            params,
            "Error while getting summary data",
        )
        .await
    }

    /// Most recent entry, or `None` when the user has no data yet.
    pub async fn latest_entry(&self, access_token: &str) -> Result<Option<WeightEntry>, AppError> {
        self.get_json(
            "latest-entry",
            access_token,
            &[],
            "Error while getting latest entry",
        )
        .await
    }

    /// Create a manual entry. A duplicate date answers 409.
    pub async fn add_entry(
        &self,
        access_token: &str,
        entry: &NewWeightEntry,
    ) -> Result<(), AppError> {
        let url = format!("{}/daily-entry", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(entry)
            .send()
            .await?;

        let fallback = if response.status() == StatusCode::CONFLICT {
            "Entry with that data already exists"
        } else {
            "Error while adding entry"
        };
        self.check_response(response, fallback).await?;
        Ok(())
    }

    pub async fn delete_entry(
        &self,
        access_token: &str,
        entry_date: NaiveDate,
    ) -> Result<(), AppError> {
        let url = format!("{}/daily-entry", self.base_url);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(access_token)
            .query(&[("entry_date", format_date(entry_date))])
            .send()
            .await?;

        self.check_response(response, "Error while deleting entry")
            .await?;
        Ok(())
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        access_token: &str,
        params: &QueryParams,
        fallback: &str,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}", self.base_url, route);
        tracing::debug!(route, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(params)
            .send()
            .await?;

        let response = self.check_response(response, fallback).await?;
        response.json().await.map_err(|e| {
            tracing::warn!(route, error = %e, "Malformed backend response");
            AppError::Api {
                status: StatusCode::OK.as_u16(),
                message: fallback.to_string(),
            }
        })
    }

    /// Pass successful responses through; turn the rest into `AppError::Api`.
    async fn check_response(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| extract_error_message(&body))
            .unwrap_or_else(|| fallback.to_string());

        tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
