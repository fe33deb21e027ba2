//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading the observation table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("No usable rows in {0}")]
    NoUsableRows(String),
}

/// Errors for malformed aggregation requests.
///
/// A valid request that matches zero rows is NOT one of these:
/// an empty slice produces an empty result and the renderer shows
/// a placeholder.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Unknown metric code: {0}")]
    UnknownMetric(String),

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("Request selects no metrics")]
    NoMetrics,

    #[error("Metric '{0}' cannot be drawn on the map (use grp or grp_pc)")]
    MetricNotMappable(String),
}

/// Errors that can occur while loading boundary polygons
#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("Failed to read boundary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Boundary JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Boundary data has no features array")]
    NoFeatures,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
