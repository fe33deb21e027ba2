//! Boundary polygon loading and the map join.
//!
//! The boundary file is plain GeoJSON. We keep it as a
//! `serde_json::Value` (the renderer passes it on verbatim) and only
//! rewrite each feature's name property through the alias table, once
//! at load, so polygon names match the observation table's Region
//! column.

use crate::geo::alias::canonical_region;
use crate::pipeline::views::RegionValue;
use crate::utils::config::BOUNDARY_NAME_PROPERTY;
use crate::utils::error::BoundaryError;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Boundary polygons with normalized region names
#[derive(Debug, Clone)]
pub struct BoundarySet {
    geojson: Value,
    names: Vec<String>,
}

impl BoundarySet {
    /// The full GeoJSON document, names already normalized
    pub fn geojson(&self) -> &Value {
        &self.geojson
    }

    /// Region names of all features, in file order
    pub fn region_names(&self) -> &[String] {
        &self.names
    }

    /// Number of named features
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no feature carried a name
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Result of joining per-region values onto boundary polygons.
///
/// A name present on only one side is excluded and reported here, not
/// an error: the map renders partially filled.
#[derive(Debug, Clone)]
pub struct MapJoin {
    /// Data rows whose region has a polygon
    pub rows: Vec<RegionValue>,

    /// Data regions with no polygon (dropped from the map)
    pub unmatched_data: Vec<String>,

    /// Polygon names with no data (rendered unfilled)
    pub unfilled_boundaries: Vec<String>,
}

/// Load boundary polygons and normalize their region names
///
/// **Public** - called once at startup for map queries
///
/// # Arguments
/// * `path` - GeoJSON file with a `features` array; each feature's
///   `properties.NAME_1` carries the region name
///
/// # Returns
/// A `BoundarySet` whose names match the observation table's Region
/// column wherever an alias exists
///
/// # Errors
/// * `BoundaryError::Io` - file cannot be read
/// * `BoundaryError::Json` - not valid JSON
/// * `BoundaryError::NoFeatures` - no `features` array present
pub fn load_boundaries(path: impl AsRef<Path>) -> Result<BoundarySet, BoundaryError> {
    let path = path.as_ref();
    debug!("Loading boundaries from: {}", path.display());

    let file = File::open(path)?;
    let mut geojson: Value = serde_json::from_reader(BufReader::new(file))?;

    let features = geojson
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or(BoundaryError::NoFeatures)?;

    let mut names = Vec::with_capacity(features.len());

    for feature in features.iter_mut() {
        let Some(properties) = feature
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        else {
            continue;
        };
        let Some(name) = properties
            .get(BOUNDARY_NAME_PROPERTY)
            .and_then(Value::as_str)
        else {
            continue;
        };

        let name = name.to_string();
        let canonical = canonical_region(&name);
        if canonical != name {
            properties.insert(
                BOUNDARY_NAME_PROPERTY.to_string(),
                Value::String(canonical.to_string()),
            );
        }
        names.push(canonical.to_string());
    }

    debug!("Loaded {} named boundary features", names.len());

    Ok(BoundarySet { geojson, names })
}

/// Join per-region values onto boundary polygons by canonical name
///
/// **Public** - the last step before map rendering
///
/// Join mismatches are tolerated and logged; they shrink the map
/// rather than failing the request.
pub fn join_map_values(boundaries: &BoundarySet, values: &[RegionValue]) -> MapJoin {
    let polygon_names: HashSet<&str> =
        boundaries.region_names().iter().map(String::as_str).collect();
    let data_names: HashSet<&str> = values.iter().map(|v| v.region.as_str()).collect();

    let mut rows = Vec::with_capacity(values.len());
    let mut unmatched_data = Vec::new();

    for value in values {
        if polygon_names.contains(value.region.as_str()) {
            rows.push(value.clone());
        } else {
            warn!("Region '{}' has no boundary polygon, dropped from map", value.region);
            unmatched_data.push(value.region.clone());
        }
    }

    let mut unfilled_boundaries: Vec<String> = boundaries
        .region_names()
        .iter()
        .filter(|name| !data_names.contains(name.as_str()))
        .cloned()
        .collect();
    unfilled_boundaries.dedup();

    for name in &unfilled_boundaries {
        warn!("Boundary '{}' has no data for this slice, rendered unfilled", name);
    }

    MapJoin {
        rows,
        unmatched_data,
        unfilled_boundaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_geojson(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME_1": "Andijon"}, "geometry": null},
            {"type": "Feature", "properties": {"NAME_1": "Atlantis"}, "geometry": null}
        ]
    }"#;

    #[test]
    fn test_load_normalizes_known_names() {
        let file = write_geojson(SAMPLE);
        let boundaries = load_boundaries(file.path()).unwrap();

        assert_eq!(
            boundaries.region_names(),
            &["Andijan region".to_string(), "Atlantis".to_string()]
        );

        // The GeoJSON itself is rewritten, so the renderer's
        // featureidkey lookup matches too
        let rewritten = boundaries.geojson()["features"][0]["properties"]["NAME_1"]
            .as_str()
            .unwrap();
        assert_eq!(rewritten, "Andijan region");
    }

    #[test]
    fn test_load_without_features_is_an_error() {
        let file = write_geojson(r#"{"type": "FeatureCollection"}"#);
        assert!(matches!(
            load_boundaries(file.path()),
            Err(BoundaryError::NoFeatures)
        ));
    }

    #[test]
    fn test_join_drops_unmatched_sides() {
        let file = write_geojson(SAMPLE);
        let boundaries = load_boundaries(file.path()).unwrap();

        let values = vec![
            RegionValue {
                region: "Andijan region".to_string(),
                value: 10.0,
            },
            RegionValue {
                region: "Tashkent city".to_string(),
                value: 20.0,
            },
        ];

        let join = join_map_values(&boundaries, &values);
        assert_eq!(join.rows.len(), 1);
        assert_eq!(join.rows[0].region, "Andijan region");
        assert_eq!(join.unmatched_data, vec!["Tashkent city".to_string()]);
        assert_eq!(join.unfilled_boundaries, vec!["Atlantis".to_string()]);
    }
}
