// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily weight entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors};

/// One recorded weight measurement. `entry_date` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightEntry {
    /// Older backends call this field `date`
    #[serde(alias = "date")]
    pub entry_date: NaiveDate,
    /// Kilograms
    pub weight: f64,
}

/// Body of `POST /daily-entry`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewWeightEntry {
    #[validate(custom(function = "not_in_future"))]
    pub entry_date: NaiveDate,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be a positive number"))]
    pub weight: f64,
}

impl NewWeightEntry {
    /// Validate and return the first human-readable problem, if any.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|errs| first_message(&errs))
    }
}

fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > crate::time_utils::today() {
        return Err(ValidationError::new("future_date")
            .with_message("Date cannot be in the future".into()));
    }
    Ok(())
}

fn first_message(errs: &ValidationErrors) -> String {
    // Report the date before the weight when both are wrong.
    let fields = errs.field_errors();
    ["entry_date", "weight"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|list| list.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid entry".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_entry_accepts_legacy_date_field() {
        let entry: WeightEntry =
            serde_json::from_str(r#"{"date": "2024-03-01", "weight": 80.5}"#).unwrap();
        assert_eq!(entry.entry_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_new_entry_rejects_future_date() {
        let entry = NewWeightEntry {
            entry_date: crate::time_utils::today() + Duration::days(1),
            weight: 80.0,
        };
        assert_eq!(entry.check().unwrap_err(), "Date cannot be in the future");
    }

    #[test]
    fn test_new_entry_rejects_non_positive_weight() {
        let entry = NewWeightEntry {
            entry_date: crate::time_utils::today(),
            weight: 0.0,
        };
        assert_eq!(entry.check().unwrap_err(), "Weight must be a positive number");
    }

    #[test]
    fn test_new_entry_today_is_valid() {
        let entry = NewWeightEntry {
            entry_date: crate::time_utils::today(),
            weight: 72.3,
        };
        assert!(entry.check().is_ok());
    }
}
