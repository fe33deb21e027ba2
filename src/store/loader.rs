//! CSV ingestion for the observation table.
//!
//! The loader is the only write path in the system: it runs once at
//! startup, trims region names, validates each row against the
//! observation schema, and hands back an immutable `RecordStore`.
//! Malformed rows are logged and skipped rather than failing the load.

use super::schema::{Metric, Observation};
use super::RecordStore;
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;

/// Raw CSV row, prior to schema validation.
///
/// Every field is optional at this stage; `into_observation` decides
/// which absences are tolerable. The Creditor column itself may be
/// missing from the file (datasets exported before the debt breakdown
/// was added have no such column).
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Year")]
    year: Option<i32>,

    #[serde(rename = "Region")]
    region: Option<String>,

    #[serde(rename = "Metric")]
    metric: Option<String>,

    #[serde(rename = "Sector")]
    sector: Option<String>,

    #[serde(rename = "Creditor", default)]
    creditor: Option<String>,

    #[serde(rename = "Value")]
    value: Option<f64>,
}

impl RawRecord {
    /// Validate one raw row into an `Observation`.
    ///
    /// Returns `None` (with a reason) when the row is missing a year
    /// or names a metric outside the catalog. Whitespace around the
    /// region name is stripped here, once, so every later join and
    /// filter sees canonical strings.
    fn into_observation(self) -> Result<Observation, &'static str> {
        let year = self.year.ok_or("missing year")?;
        let metric = self
            .metric
            .as_deref()
            .map(str::trim)
            .and_then(Metric::from_label)
            .ok_or("unrecognized metric label")?;

        Ok(Observation {
            year,
            region: trim_cell(self.region),
            metric,
            sector: trim_cell(self.sector),
            creditor: trim_cell(self.creditor),
            value: self.value,
        })
    }
}

/// Trim a text cell; whitespace-only cells become absent
fn trim_cell(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Load the observation table from a CSV file
///
/// **Public** - main entry point for data loading
///
/// # Arguments
/// * `path` - CSV file with Year, Region, Metric, Sector, Value columns
///   (and optionally Creditor)
///
/// # Returns
/// An immutable `RecordStore` ready for aggregation
///
/// # Errors
/// * `LoadError::Csv` - file missing or CSV structure invalid
/// * `LoadError::NoUsableRows` - file parsed but no row passed validation
pub fn load_records(path: impl AsRef<Path>) -> Result<RecordStore, LoadError> {
    let path = path.as_ref();
    debug!("Loading observations from: {}", path.display());

    let mut reader = csv::Reader::from_path(path)?;

    let mut observations = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.deserialize::<RawRecord>().enumerate() {
        // Header is line 1, so the first data row is line 2
        let line = index + 2;

        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping line {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        match raw.into_observation() {
            Ok(observation) => observations.push(observation),
            Err(reason) => {
                warn!("Skipping line {}: {}", line, reason);
                skipped += 1;
            }
        }
    }

    if observations.is_empty() {
        return Err(LoadError::NoUsableRows(path.display().to_string()));
    }

    info!(
        "Loaded {} observations from {} ({} rows skipped)",
        observations.len(),
        path.display(),
        skipped
    );

    Ok(RecordStore::new(observations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_trims_region_whitespace() {
        let file = write_csv(
            "Year,Region,Metric,Sector,Creditor,Value\n\
             2023,  Tashkent region  ,State budget income,Services,,120.5\n",
        );

        let store = load_records(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        let obs = &store.observations()[0];
        assert_eq!(obs.region.as_deref(), Some("Tashkent region"));
        assert_eq!(obs.metric, Metric::Income);
        assert_eq!(obs.sector.as_deref(), Some("Services"));
        assert_eq!(obs.value, Some(120.5));
    }

    #[test]
    fn test_load_skips_rows_without_year_or_metric() {
        let file = write_csv(
            "Year,Region,Metric,Sector,Creditor,Value\n\
             ,Tashkent region,State budget income,,,10\n\
             2023,Tashkent region,Not a metric,,,10\n\
             2023,Tashkent region,Public Debt,,,10\n",
        );

        let store = load_records(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.observations()[0].metric, Metric::Debt);
    }

    #[test]
    fn test_load_without_creditor_column() {
        let file = write_csv(
            "Year,Region,Metric,Sector,Value\n\
             2023,,Public Debt,,431.0\n",
        );

        let store = load_records(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.observations()[0].creditor.is_none());
        assert!(!store.has_creditor_dimension());
    }

    #[test]
    fn test_load_empty_value_cell_is_absent() {
        let file = write_csv(
            "Year,Region,Metric,Sector,Creditor,Value\n\
             2023,Navoi region,Gross Regional Product,,,\n",
        );

        let store = load_records(file.path()).unwrap();
        assert_eq!(store.observations()[0].value, None);
    }

    #[test]
    fn test_load_all_rows_invalid_is_an_error() {
        let file = write_csv(
            "Year,Region,Metric,Sector,Creditor,Value\n\
             ,,,,,\n",
        );

        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::NoUsableRows(_)));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let err = load_records("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
