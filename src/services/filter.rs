// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filter state: look back N weeks, or an explicit date range.
//!
//! The two modes are mutually exclusive. Input is validated before it is
//! published; a rejected change leaves the previous selection in place and
//! raises exactly one error toast.

use crate::services::toast::Toaster;
use crate::time_utils::{format_date, parse_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const DEFAULT_WEEKS_LIMIT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Weeks,
    Dates,
}

/// Active filter. `weeks_limit` is positive when set; `date_to >= date_from`
/// when both are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FilterSelection {
    Weeks {
        weeks_limit: Option<u32>,
    },
    Dates {
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    },
}

impl Default for FilterSelection {
    fn default() -> Self {
        FilterSelection::Weeks {
            weeks_limit: Some(DEFAULT_WEEKS_LIMIT),
        }
    }
}

impl FilterSelection {
    /// Empty selection for a mode.
    pub fn empty(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Weeks => FilterSelection::Weeks { weeks_limit: None },
            FilterMode::Dates => FilterSelection::Dates {
                date_from: None,
                date_to: None,
            },
        }
    }

    pub fn mode(&self) -> FilterMode {
        match self {
            FilterSelection::Weeks { .. } => FilterMode::Weeks,
            FilterSelection::Dates { .. } => FilterMode::Dates,
        }
    }

    /// Backend query parameters: `weeks_limit`, or `date_from`/`date_to`.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            FilterSelection::Weeks { weeks_limit } => weeks_limit
                .map(|w| vec![("weeks_limit", w.to_string())])
                .unwrap_or_default(),
            FilterSelection::Dates { date_from, date_to } => {
                let mut params = Vec::with_capacity(2);
                if let Some(from) = date_from {
                    params.push(("date_from", format_date(*from)));
                }
                if let Some(to) = date_to {
                    params.push(("date_to", format_date(*to)));
                }
                params
            }
        }
    }

    /// Summary section title for this selection.
    pub fn heading(&self) -> String {
        match self {
            FilterSelection::Weeks {
                weeks_limit: Some(weeks),
            } => format!("Summary for the past {} weeks", weeks),
            FilterSelection::Weeks { weeks_limit: None } => {
                "Summary from beginning to today".to_string()
            }
            FilterSelection::Dates { date_from, date_to } => format!(
                "Summary from {} to {}",
                date_from.map(format_date).as_deref().unwrap_or("beginning"),
                date_to.map(format_date).as_deref().unwrap_or("today"),
            ),
        }
    }
}

/// Owner of the filter selection. Views observe it through `subscribe`.
pub struct FilterState {
    tx: watch::Sender<FilterSelection>,
    toaster: Toaster,
}

impl FilterState {
    pub fn new(toaster: Toaster) -> Self {
        let (tx, _rx) = watch::channel(FilterSelection::default());
        Self { tx, toaster }
    }

    pub fn selection(&self) -> FilterSelection {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSelection> {
        self.tx.subscribe()
    }

    /// Switch modes, clearing the values of the mode being left.
    pub fn switch_mode(&self, mode: FilterMode) {
        if self.tx.borrow().mode() == mode {
            return;
        }
        tracing::debug!(?mode, "Filter mode switched");
        self.tx.send_replace(FilterSelection::empty(mode));
    }

    /// Back to the default look-back window.
    pub fn reset(&self) {
        self.publish(FilterSelection::default());
    }

    /// Apply a typed weeks value. Returns whether it was accepted.
    pub fn set_weeks_limit(&self, raw: &str) -> bool {
        let raw = raw.trim();
        let weeks_limit = if raw.is_empty() {
            None
        } else {
            match raw.parse::<u32>() {
                Ok(weeks) if weeks > 0 => Some(weeks),
                _ => {
                    self.toaster
                        .error("Weeks limit must be a positive whole number");
                    return false;
                }
            }
        };

        self.publish(FilterSelection::Weeks { weeks_limit });
        true
    }

    /// Apply typed range bounds; empty strings mean "open ended".
    /// Returns whether the range was accepted.
    pub fn set_dates(&self, date_from: Option<&str>, date_to: Option<&str>) -> bool {
        let date_from = match self.parse_bound(date_from) {
            Ok(date) => date,
            Err(()) => return false,
        };
        let date_to = match self.parse_bound(date_to) {
            Ok(date) => date,
            Err(()) => return false,
        };

        if let (Some(from), Some(to)) = (date_from, date_to) {
            if to < from {
                self.toaster.error("'Date To' must be after 'Date From'");
                return false;
            }
        }

        self.publish(FilterSelection::Dates { date_from, date_to });
        true
    }

    fn parse_bound(&self, raw: Option<&str>) -> Result<Option<NaiveDate>, ()> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(text) => match parse_date(text) {
                Some(date) => Ok(Some(date)),
                None => {
                    self.toaster.error(format!("Invalid date: '{}'", text));
                    Err(())
                }
            },
        }
    }

    fn publish(&self, selection: FilterSelection) {
        self.tx.send_if_modified(|current| {
            if *current == selection {
                return false;
            }
            tracing::debug!(?selection, "Filter updated");
            *current = selection;
            true
        });
    }
}
