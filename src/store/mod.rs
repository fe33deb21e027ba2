//! The Record Store: an in-memory, immutable-after-load observation table.
//!
//! This module handles:
//! - The observation schema and metric catalog
//! - CSV ingestion into a `RecordStore`
//! - Read-only accessors the pipeline and CLI query against

pub mod loader;
pub mod schema;

// Re-export main types
pub use loader::load_records;
pub use schema::{Metric, Observation};

/// Immutable table of observations, loaded once at process start.
///
/// Every aggregate call reads from this snapshot; nothing mutates it
/// after construction, so any number of queries may run against it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    observations: Vec<Observation>,
}

impl RecordStore {
    /// Wrap a loaded observation set
    ///
    /// **Public** - constructor, used by the loader and by tests
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// All rows, in load order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct years present in the data, sorted numerically ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.observations.iter().map(|o| o.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Most recent year in the data (the default for year dropdowns)
    pub fn latest_year(&self) -> Option<i32> {
        self.observations.iter().map(|o| o.year).max()
    }

    /// Distinct non-null region names, sorted ascending
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .observations
            .iter()
            .filter_map(|o| o.region.clone())
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }

    /// Distinct years that carry Public Debt rows, sorted ascending.
    ///
    /// The creditor table only offers these years for selection.
    pub fn debt_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .observations
            .iter()
            .filter(|o| o.metric == Metric::Debt)
            .map(|o| o.year)
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Whether the loaded data carries a creditor dimension at all.
    ///
    /// When it does not, the creditor ranking degrades to a single
    /// synthetic "Total" row.
    pub fn has_creditor_dimension(&self) -> bool {
        self.observations.iter().any(|o| o.creditor.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, metric: Metric) -> Observation {
        Observation {
            year,
            region: None,
            metric,
            sector: None,
            creditor: None,
            value: Some(1.0),
        }
    }

    #[test]
    fn test_years_sorted_numerically() {
        let store = RecordStore::new(vec![
            obs(2024, Metric::Income),
            obs(2020, Metric::Income),
            obs(2022, Metric::Income),
            obs(2020, Metric::Expense),
        ]);

        assert_eq!(store.years(), vec![2020, 2022, 2024]);
        assert_eq!(store.latest_year(), Some(2024));
    }

    #[test]
    fn test_regions_deduplicated_and_sorted() {
        let mut a = obs(2023, Metric::Grp);
        a.region = Some("Tashkent region".to_string());
        let mut b = obs(2023, Metric::Grp);
        b.region = Some("Andijan region".to_string());
        let mut c = obs(2024, Metric::Grp);
        c.region = Some("Tashkent region".to_string());

        let store = RecordStore::new(vec![a, b, c]);
        assert_eq!(
            store.regions(),
            vec!["Andijan region".to_string(), "Tashkent region".to_string()]
        );
    }

    #[test]
    fn test_debt_years_only_count_debt_rows() {
        let store = RecordStore::new(vec![
            obs(2020, Metric::Income),
            obs(2022, Metric::Debt),
            obs(2021, Metric::Debt),
        ]);
        assert_eq!(store.debt_years(), vec![2021, 2022]);
    }

    #[test]
    fn test_creditor_dimension_detection() {
        let mut with_creditor = obs(2023, Metric::Debt);
        with_creditor.creditor = Some("World Bank".to_string());

        let store = RecordStore::new(vec![obs(2023, Metric::Debt)]);
        assert!(!store.has_creditor_dimension());

        let store = RecordStore::new(vec![obs(2023, Metric::Debt), with_creditor]);
        assert!(store.has_creditor_dimension());
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::new(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.latest_year(), None);
        assert!(store.years().is_empty());
    }
}
