//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default observation table location
pub const DEFAULT_DATA_FILE: &str = "data/observations.csv";

/// Default boundary polygons location
pub const DEFAULT_BOUNDARY_FILE: &str = "data/uzbekistan_regions.geojson.json";

/// Number of rows shown in the creditor ranking table
pub const TOP_CREDITORS: usize = 10;

/// Placeholder rendered for absent values in tables and KPI cards
pub const MISSING_VALUE: &str = "—";

// GeoJSON property carrying the region name in the boundary file.
// The alias table rewrites this property in place so it matches the
// Region column of the observation table.
pub const BOUNDARY_NAME_PROPERTY: &str = "NAME_1";
