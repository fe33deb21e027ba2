//! CLI command implementations.
//!
//! Argument structs live in `models`; the execute functions in
//! `query` orchestrate the library components to answer one dashboard
//! question each.

pub mod models;
pub mod query;

// Re-export main command functions
pub use models::{CreditorArgs, KpiArgs, MapArgs, RegionArgs, SeriesArgs, TrendArgs};
pub use query::{
    execute_creditors, execute_debt_trend, execute_kpi, execute_map, execute_regions,
    execute_series,
};
