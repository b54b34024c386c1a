// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.

use chrono::{Local, NaiveDate};

/// Wire format for every date the backend accepts or returns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the user's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a typed `YYYY-MM-DD` date, rejecting impossible calendar days.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Format a date for query strings and messages.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
