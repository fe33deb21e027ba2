//! Region name normalization and boundary polygon handling.
//!
//! This module reconciles the two region-name spaces in play:
//! - The observation table's canonical names
//! - The boundary file's short local names
//! and performs the tolerant join that backs the choropleth map.

pub mod alias;
pub mod boundary;

// Re-export main types and functions
pub use alias::{canonical_region, REGION_ALIASES};
pub use boundary::{join_map_values, load_boundaries, BoundarySet, MapJoin};
