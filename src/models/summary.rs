// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress summary over the filtered period.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryMetrics {
    /// kg over the whole period
    pub total_change: f64,
    /// kg per week
    pub avg_change: f64,
    /// % of bodyweight per week
    pub avg_change_prc: f64,
    /// kcal per day
    pub avg_net_calories: i64,
}

impl SummaryMetrics {
    /// Signed strings for the summary cards.
    pub fn cards(&self) -> SummaryCards {
        SummaryCards {
            total_change: to_signed_string(self.total_change, 2),
            avg_change: to_signed_string(self.avg_change, 2),
            avg_change_prc: to_signed_string(self.avg_change_prc, 2),
            avg_net_calories: to_signed_string(self.avg_net_calories as f64, 0),
        }
    }
}

/// [`SummaryMetrics`] as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SummaryCards {
    pub total_change: String,
    pub avg_change: String,
    pub avg_change_prc: String,
    pub avg_net_calories: String,
}

/// `GET /summary` response envelope. `metrics` is null without data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub metrics: Option<SummaryMetrics>,
}

/// Format a number with an explicit sign: `+1.25`, `-0.50`.
///
/// Zero is rendered with a minus sign, matching the dashboard cards.
pub fn to_signed_string(num: f64, decimals: usize) -> String {
    let sign = if num > 0.0 { '+' } else { '-' };
    format!("{}{:.*}", sign, decimals, num.abs())
}
