// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models shared by the backend client and the dashboard shell.

pub mod aggregate;
pub mod data_source;
pub mod entry;
pub mod goal;
pub mod summary;

pub use aggregate::{WeekResult, WeeklyAggregate, WeeklyAggregateResponse};
pub use data_source::{DataSource, SourceOption};
pub use entry::{NewWeightEntry, WeightEntry};
pub use goal::Goal;
pub use summary::{SummaryCards, SummaryMetrics, SummaryResponse};
