//! Argument structs for the query commands.
//!
//! main.rs builds these from CLI flags; tests build them directly.

use crate::utils::config::{DEFAULT_BOUNDARY_FILE, DEFAULT_DATA_FILE};
use std::path::PathBuf;

/// Arguments for the KPI card query
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct KpiArgs {
    /// Observation table location
    pub data_file: PathBuf,

    /// Year to summarize; None = most recent year in the data
    pub year: Option<i32>,

    /// Optional JSON document output path
    pub output: Option<PathBuf>,
}

/// Arguments for the income/expenditure trend query
#[derive(Debug, Clone)]
pub struct SeriesArgs {
    pub data_file: PathBuf,

    /// Range start; None = earliest year in the data
    pub from: Option<i32>,

    /// Range end; None = most recent year in the data
    pub to: Option<i32>,

    pub output: Option<PathBuf>,
}

/// Arguments for the by-region breakdown query
#[derive(Debug, Clone)]
pub struct RegionArgs {
    pub data_file: PathBuf,
    pub year: Option<i32>,

    /// Regions to include; empty = all regions
    pub regions: Vec<String>,

    pub output: Option<PathBuf>,
}

/// Arguments for the choropleth map query
#[derive(Debug, Clone)]
pub struct MapArgs {
    pub data_file: PathBuf,

    /// Boundary polygon file (GeoJSON)
    pub boundary_file: PathBuf,

    pub year: Option<i32>,

    /// Metric code: grp or grp_pc
    pub metric: String,

    pub output: Option<PathBuf>,
}

/// Arguments for the top-creditor table query
#[derive(Debug, Clone)]
pub struct CreditorArgs {
    pub data_file: PathBuf,

    /// Year to rank; None = most recent year carrying Debt rows
    pub year: Option<i32>,

    pub output: Option<PathBuf>,
}

/// Arguments for the public-debt trend query
#[derive(Debug, Clone)]
pub struct TrendArgs {
    pub data_file: PathBuf,
    pub output: Option<PathBuf>,
}

impl Default for KpiArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            year: None,
            output: None,
        }
    }
}

impl Default for SeriesArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            from: None,
            to: None,
            output: None,
        }
    }
}

impl Default for RegionArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            year: None,
            regions: Vec::new(),
            output: None,
        }
    }
}

impl Default for MapArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            boundary_file: PathBuf::from(DEFAULT_BOUNDARY_FILE),
            year: None,
            metric: "grp".to_string(),
            output: None,
        }
    }
}

impl Default for CreditorArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            year: None,
            output: None,
        }
    }
}

impl Default for TrendArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            output: None,
        }
    }
}
