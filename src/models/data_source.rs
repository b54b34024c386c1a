// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External fitness-data providers the backend can pull weight data from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Google Fit
    Gfit,
    /// MyFitnessPal
    Mfp,
}

impl DataSource {
    pub const ALL: [DataSource; 2] = [DataSource::Gfit, DataSource::Mfp];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Gfit => "gfit",
            DataSource::Mfp => "mfp",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DataSource::Gfit => "Google Fit",
            DataSource::Mfp => "MyFitnessPal",
        }
    }
}

/// A sync button: the source it pulls from and its caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SourceOption {
    pub id: DataSource,
    pub label: String,
}

impl SourceOption {
    pub fn all() -> Vec<SourceOption> {
        DataSource::ALL
            .into_iter()
            .map(|id| SourceOption {
                id,
                label: format!("Get {} Data", id.display_name()),
            })
            .collect()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for identifiers outside the known provider set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown data source '{0}'")]
pub struct UnknownDataSource(pub String);

impl FromStr for DataSource {
    type Err = UnknownDataSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataSource::ALL
            .into_iter()
            .find(|src| src.as_str() == s)
            .ok_or_else(|| UnknownDataSource(s.to_string()))
    }
}
