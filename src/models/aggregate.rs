// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-derived weekly rollups. The client never recomputes these.

use super::Goal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Whether a week moved in the direction of the user's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum WeekResult {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyAggregate {
    pub week_start: NaiveDate,
    pub avg_weight: f64,
    pub weight_change: f64,
    pub weight_change_prc: f64,
    /// Estimated daily caloric balance (kcal)
    pub net_calories: i64,
    pub result: WeekResult,
}

/// `GET /weekly-aggregates` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyAggregateResponse {
    pub weekly_data: Vec<WeeklyAggregate>,
    pub goal: Goal,
    /// Set when the backend substituted a default for an invalid goal
    #[serde(default)]
    pub warning_message: Option<String>,
}
