//! The Aggregation Pipeline: the filter-group-summarize logic shared
//! by all views.
//!
//! This module turns an `AggregationRequest` into an ordered result
//! deterministically and without side effects:
//! - Request types and the year filter
//! - The generic filter/group/combine engine
//! - Composed calls, one per dashboard visual

pub mod aggregate;
pub mod request;
pub mod views;

// Re-export main types and functions
pub use aggregate::{aggregate, aggregate_unsorted, GroupKey, ResultRow};
pub use request::{AggregationRequest, Combine, GroupField, YearFilter};
pub use views::{
    budget_series, debt_trend, kpi_summary, map_values, region_breakdown, top_creditors,
    CreditorRanking, CreditorRow, KpiSummary, RegionValue,
};
