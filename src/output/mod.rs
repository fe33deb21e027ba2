//! Presentation adapters: thin formatting over pipeline results.
//!
//! This module handles:
//! - Chart-ready JSON documents written to disk
//! - Number formatting and plain-text tables for the terminal

pub mod json;
pub mod table;

// Re-export main functions
pub use json::{
    read_document, write_document, CreditorDocument, KpiDocument, MapDocument, RegionDocument,
    SeriesDocument,
};
pub use table::{format_value, render_table};
