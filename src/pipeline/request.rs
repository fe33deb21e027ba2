//! Aggregation request types.
//!
//! A request names the metric slice, the year filter, optional region
//! and sector constraints, the grouping tuple, and the combine rule.
//! Requests are ephemeral: built per query, handed to `aggregate`,
//! and discarded.

use crate::store::Metric;
use crate::utils::error::RequestError;

/// Year selection: one year, or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    /// Exact equality on one year
    Single(i32),

    /// Inclusive bounds; `start <= end` always holds for values built
    /// through `YearFilter::range`
    Range { start: i32, end: i32 },
}

impl YearFilter {
    /// Build an inclusive year range
    ///
    /// An inverted range is rejected rather than swapped. Callers that
    /// collect bounds from user input surface the error directly.
    ///
    /// # Errors
    /// * `RequestError::InvalidYearRange` - `start` is after `end`
    pub fn range(start: i32, end: i32) -> Result<YearFilter, RequestError> {
        if start > end {
            return Err(RequestError::InvalidYearRange { start, end });
        }
        Ok(YearFilter::Range { start, end })
    }

    /// Whether the given year passes this filter
    pub fn matches(&self, year: i32) -> bool {
        match *self {
            YearFilter::Single(y) => year == y,
            YearFilter::Range { start, end } => year >= start && year <= end,
        }
    }
}

/// Fields a result may be grouped by, in request order.
///
/// Grouping by a nullable field (region, sector, creditor) excludes
/// rows where that field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Year,
    Region,
    Metric,
    Sector,
    Creditor,
}

/// How values combine within a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Sum of values, absent treated as 0
    Sum,

    /// Arithmetic mean over present values only; absent values are
    /// excluded from both numerator and denominator. A present zero
    /// counts as present.
    Mean,
}

/// A complete aggregation request
///
/// **Public** - the pipeline's input contract
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    /// Metric slice; must be non-empty
    pub metrics: Vec<Metric>,

    /// Year filter applied with exact equality or inclusive bounds
    pub years: YearFilter,

    /// Region filter; empty means no region filtering
    pub regions: Vec<String>,

    /// When true, rows without a sector are excluded
    pub require_sector: bool,

    /// Grouping tuple; empty collapses the whole slice into one row
    pub group_by: Vec<GroupField>,

    /// Combine rule within each partition
    pub combine: Combine,
}

impl AggregationRequest {
    /// Create a request with no region filter, no sector requirement,
    /// no grouping, and sum combining
    pub fn new(metrics: Vec<Metric>, years: YearFilter) -> Self {
        Self {
            metrics,
            years,
            regions: Vec::new(),
            require_sector: false,
            group_by: Vec::new(),
            combine: Combine::Sum,
        }
    }

    /// Restrict to the given regions (empty list = all regions)
    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    /// Exclude rows without a sector
    pub fn with_sector_required(mut self) -> Self {
        self.require_sector = true;
        self
    }

    /// Set the grouping tuple
    pub fn with_group_by(mut self, fields: Vec<GroupField>) -> Self {
        self.group_by = fields;
        self
    }

    /// Combine partitions by arithmetic mean instead of sum
    pub fn with_mean(mut self) -> Self {
        self.combine = Combine::Mean;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let err = YearFilter::range(2024, 2020).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidYearRange { start: 2024, end: 2020 }
        ));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let filter = YearFilter::range(2020, 2022).unwrap();
        assert!(filter.matches(2020));
        assert!(filter.matches(2021));
        assert!(filter.matches(2022));
        assert!(!filter.matches(2019));
        assert!(!filter.matches(2023));
    }

    #[test]
    fn test_single_year_matches_exactly() {
        let filter = YearFilter::Single(2023);
        assert!(filter.matches(2023));
        assert!(!filter.matches(2022));
    }

    #[test]
    fn test_builder_defaults() {
        let request = AggregationRequest::new(vec![Metric::Income], YearFilter::Single(2024));
        assert!(request.regions.is_empty());
        assert!(!request.require_sector);
        assert!(request.group_by.is_empty());
        assert_eq!(request.combine, Combine::Sum);
    }
}
