//! Chart-ready JSON documents.
//!
//! Each dashboard view has one document shape, carrying the schema
//! version and a generation timestamp alongside the data points. The
//! renderer consumes these verbatim; no formatting happens here
//! beyond serialization.

use crate::pipeline::aggregate::{GroupKey, ResultRow};
use crate::pipeline::views::{CreditorRanking, KpiSummary, RegionValue};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// One (year, metric) point of a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub metric: String,
    pub value: f64,
}

/// A year-keyed series document (trend charts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesDocument {
    pub version: String,
    pub title: String,
    pub points: Vec<SeriesPoint>,
    pub generated_at: String,
}

/// One (region, metric) point of a regional breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionPoint {
    pub region: String,
    pub metric: String,
    pub value: f64,
}

/// A region-keyed breakdown document (area chart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDocument {
    pub version: String,
    pub title: String,
    pub year: i32,
    pub points: Vec<RegionPoint>,
    pub generated_at: String,
}

/// The six KPI scalars for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiDocument {
    pub version: String,
    pub year: i32,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub net: Option<f64>,
    pub avg_grp: Option<f64>,
    pub avg_grp_per_capita: Option<f64>,
    pub public_debt: Option<f64>,
    pub generated_at: String,
}

/// One filled region of the choropleth
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRegion {
    pub region: String,
    pub value: f64,
}

/// Choropleth data for one year and metric, join results included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDocument {
    pub version: String,
    pub year: i32,
    pub metric: String,
    pub regions: Vec<MapRegion>,
    /// Polygon names with no data; the renderer leaves them unfilled
    pub unfilled: Vec<String>,
    pub generated_at: String,
}

/// One creditor row of the debt table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditorEntry {
    pub creditor: String,
    pub value: f64,
}

/// The top-creditor table for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditorDocument {
    pub version: String,
    pub year: i32,
    pub rows: Vec<CreditorEntry>,
    /// True when the single row is the synthetic grand total
    pub synthetic_total: bool,
    pub generated_at: String,
}

impl SeriesDocument {
    /// Build from (year, metric) grouped pipeline rows
    pub fn from_rows(title: impl Into<String>, rows: &[ResultRow]) -> Self {
        let points = rows
            .iter()
            .filter_map(|row| match (row.key.first(), row.key.get(1)) {
                (Some(&GroupKey::Year(year)), Some(GroupKey::Text(metric))) => {
                    Some(SeriesPoint {
                        year,
                        metric: metric.clone(),
                        value: row.value.unwrap_or(0.0),
                    })
                }
                (Some(&GroupKey::Year(year)), None) => Some(SeriesPoint {
                    year,
                    metric: String::new(),
                    value: row.value.unwrap_or(0.0),
                }),
                _ => None,
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            title: title.into(),
            points,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl RegionDocument {
    /// Build from (region, metric) grouped pipeline rows
    pub fn from_rows(title: impl Into<String>, year: i32, rows: &[ResultRow]) -> Self {
        let points = rows
            .iter()
            .filter_map(|row| match (row.key.first(), row.key.get(1)) {
                (Some(GroupKey::Text(region)), Some(GroupKey::Text(metric))) => {
                    Some(RegionPoint {
                        region: region.clone(),
                        metric: metric.clone(),
                        value: row.value.unwrap_or(0.0),
                    })
                }
                _ => None,
            })
            .collect();

        Self {
            version: SCHEMA_VERSION.to_string(),
            title: title.into(),
            year,
            points,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl KpiDocument {
    pub fn from_summary(summary: &KpiSummary) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            year: summary.year,
            income: summary.income,
            expense: summary.expense,
            net: summary.net,
            avg_grp: summary.avg_grp,
            avg_grp_per_capita: summary.avg_grp_per_capita,
            public_debt: summary.public_debt,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl MapDocument {
    pub fn new(
        year: i32,
        metric: impl Into<String>,
        regions: &[RegionValue],
        unfilled: Vec<String>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            year,
            metric: metric.into(),
            regions: regions
                .iter()
                .map(|v| MapRegion {
                    region: v.region.clone(),
                    value: v.value,
                })
                .collect(),
            unfilled,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl CreditorDocument {
    pub fn from_ranking(ranking: &CreditorRanking) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            year: ranking.year,
            rows: ranking
                .rows
                .iter()
                .map(|r| CreditorEntry {
                    creditor: r.creditor.clone(),
                    value: r.value,
                })
                .collect(),
            synthetic_total: ranking.synthetic_total,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Write a document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_document<T: Serialize>(
    document: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing document to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a document back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_document<T: DeserializeOwned>(
    input_path: impl AsRef<Path>,
) -> Result<T, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading document from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    serde_json::from_reader(file).map_err(OutputError::SerializationFailed)
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
