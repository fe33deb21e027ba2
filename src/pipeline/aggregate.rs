//! The filter-group-combine engine shared by every view.
//!
//! Every chart, table, and KPI card in the dashboard reduces to the
//! same shape: filter the observation table by a conjunction of
//! predicates, partition the survivors by a tuple of fields, and
//! combine each partition's values. This module implements that shape
//! once; `views` composes it per visual.

use crate::pipeline::request::{AggregationRequest, Combine, GroupField};
use crate::store::{Observation, RecordStore};
use crate::utils::error::RequestError;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// One component of a group key tuple.
///
/// Years are kept numeric end to end so year ordering can never fall
/// back to string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Year(i32),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(year) => write!(f, "{}", year),
            GroupKey::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One partition of an aggregation result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Group key tuple, in `group_by` order
    pub key: Vec<GroupKey>,

    /// Combined value. Always present for sums (a partition exists
    /// only if at least one row matched); absent for a mean over a
    /// partition whose values are all missing.
    pub value: Option<f64>,
}

/// Running totals for one partition
struct Accumulator {
    key: Vec<GroupKey>,
    sum: f64,
    present_sum: f64,
    present_count: usize,
}

impl Accumulator {
    fn new(key: Vec<GroupKey>) -> Self {
        Self {
            key,
            sum: 0.0,
            present_sum: 0.0,
            present_count: 0,
        }
    }

    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.present_sum += v;
            self.present_count += 1;
        }
        // Absent values contribute 0 to the sum and nothing to the mean
    }

    fn finish(self, combine: Combine) -> ResultRow {
        let value = match combine {
            Combine::Sum => Some(self.sum),
            Combine::Mean => {
                if self.present_count > 0 {
                    Some(self.present_sum / self.present_count as f64)
                } else {
                    None
                }
            }
        };
        ResultRow {
            key: self.key,
            value,
        }
    }
}

/// Run an aggregation request against the store
///
/// **Public** - main entry point of the pipeline
///
/// # Arguments
/// * `store` - the loaded observation table
/// * `request` - metric slice, year filter, grouping, combine rule
///
/// # Returns
/// Partitions sorted ascending by the first `group_by` field
/// (numerically when that field is the year). A request that matches
/// zero rows returns an empty vector, never an error.
///
/// # Errors
/// * `RequestError::NoMetrics` - empty metric slice
/// * `RequestError::InvalidYearRange` - inverted range bounds
pub fn aggregate(
    store: &RecordStore,
    request: &AggregationRequest,
) -> Result<Vec<ResultRow>, RequestError> {
    let mut rows = aggregate_unsorted(store, request)?;

    if !request.group_by.is_empty() {
        // Stable, so equal first keys preserve encounter order
        rows.sort_by(|a, b| a.key[0].cmp(&b.key[0]));
    }

    Ok(rows)
}

/// Run an aggregation request, leaving partitions in row-encounter order.
///
/// **Public** - used by rankings that apply their own value ordering
/// and need encounter order preserved for ties (see `top_creditors`).
pub fn aggregate_unsorted(
    store: &RecordStore,
    request: &AggregationRequest,
) -> Result<Vec<ResultRow>, RequestError> {
    validate_request(request)?;

    debug!(
        "Aggregating {} rows: {} metric(s), group by {:?}",
        store.len(),
        request.metrics.len(),
        request.group_by
    );

    let mut partitions: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<Vec<GroupKey>, usize> = HashMap::new();

    for obs in store.observations() {
        if !matches_filters(obs, request) {
            continue;
        }

        // Rows whose group field is absent fall out of the partition set
        let Some(key) = group_key(obs, &request.group_by) else {
            continue;
        };

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                partitions.push(Accumulator::new(key.clone()));
                index.insert(key, partitions.len() - 1);
                partitions.len() - 1
            }
        };

        partitions[slot].add(obs.value);
    }

    debug!("Built {} partitions", partitions.len());

    Ok(partitions
        .into_iter()
        .map(|acc| acc.finish(request.combine))
        .collect())
}

/// The filter conjunction: metric, year, sector, region
fn matches_filters(obs: &Observation, request: &AggregationRequest) -> bool {
    if !request.metrics.contains(&obs.metric) {
        return false;
    }
    if !request.years.matches(obs.year) {
        return false;
    }
    if request.require_sector && obs.sector.is_none() {
        return false;
    }
    if !request.regions.is_empty() {
        match &obs.region {
            Some(region) if request.regions.iter().any(|r| r == region) => {}
            _ => return false,
        }
    }
    true
}

/// Build the group key tuple for one row.
///
/// `None` means the row has no value for one of the grouping fields
/// and is excluded from the partition set.
fn group_key(obs: &Observation, fields: &[GroupField]) -> Option<Vec<GroupKey>> {
    let mut key = Vec::with_capacity(fields.len());
    for field in fields {
        let component = match field {
            GroupField::Year => GroupKey::Year(obs.year),
            GroupField::Metric => GroupKey::Text(obs.metric.label().to_string()),
            GroupField::Region => GroupKey::Text(obs.region.clone()?),
            GroupField::Sector => GroupKey::Text(obs.sector.clone()?),
            GroupField::Creditor => GroupKey::Text(obs.creditor.clone()?),
        };
        key.push(component);
    }
    Some(key)
}

/// Reject malformed requests before touching the data
fn validate_request(request: &AggregationRequest) -> Result<(), RequestError> {
    if request.metrics.is_empty() {
        return Err(RequestError::NoMetrics);
    }
    // Range bounds are checked again here because the fields are
    // public and a filter may be constructed without the helper
    if let crate::pipeline::request::YearFilter::Range { start, end } = request.years {
        if start > end {
            return Err(RequestError::InvalidYearRange { start, end });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::request::YearFilter;
    use crate::store::Metric;

    fn obs(
        year: i32,
        region: Option<&str>,
        metric: Metric,
        sector: Option<&str>,
        value: Option<f64>,
    ) -> Observation {
        Observation {
            year,
            region: region.map(String::from),
            metric,
            sector: sector.map(String::from),
            creditor: None,
            value,
        }
    }

    fn sample_store() -> RecordStore {
        RecordStore::new(vec![
            obs(2024, Some("Andijan region"), Metric::Income, Some("Tax"), Some(100.0)),
            obs(2024, Some("Bukhara region"), Metric::Income, Some("Tax"), Some(50.0)),
            obs(2024, Some("Andijan region"), Metric::Income, None, Some(7.0)),
            obs(2023, Some("Andijan region"), Metric::Income, Some("Tax"), Some(80.0)),
            obs(2024, Some("Andijan region"), Metric::Expense, Some("Health"), Some(60.0)),
            obs(2024, None, Metric::Debt, None, Some(431.0)),
        ])
    }

    #[test]
    fn test_sum_over_single_year() {
        let store = sample_store();
        let request =
            AggregationRequest::new(vec![Metric::Income], YearFilter::Single(2024));

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].key.is_empty());
        assert_eq!(rows[0].value, Some(157.0));
    }

    #[test]
    fn test_sector_requirement_excludes_sectorless_rows() {
        let store = sample_store();
        let request = AggregationRequest::new(vec![Metric::Income], YearFilter::Single(2024))
            .with_sector_required();

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows[0].value, Some(150.0));
    }

    #[test]
    fn test_region_filter() {
        let store = sample_store();
        let request = AggregationRequest::new(vec![Metric::Income], YearFilter::Single(2024))
            .with_regions(vec!["Bukhara region".to_string()]);

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows[0].value, Some(50.0));
    }

    #[test]
    fn test_absent_year_yields_empty_result_not_error() {
        let store = sample_store();
        let request =
            AggregationRequest::new(vec![Metric::Income], YearFilter::Single(1999));

        let rows = aggregate(&store, &request).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_metric_slice_is_invalid() {
        let store = sample_store();
        let request = AggregationRequest::new(Vec::new(), YearFilter::Single(2024));

        assert!(matches!(
            aggregate(&store, &request),
            Err(RequestError::NoMetrics)
        ));
    }

    #[test]
    fn test_sum_treats_absent_values_as_zero() {
        let store = RecordStore::new(vec![
            obs(2024, None, Metric::Debt, None, Some(10.0)),
            obs(2024, None, Metric::Debt, None, None),
            obs(2024, None, Metric::Debt, None, Some(20.0)),
        ]);
        let request = AggregationRequest::new(vec![Metric::Debt], YearFilter::Single(2024));

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows[0].value, Some(30.0));
    }

    #[test]
    fn test_mean_excludes_absent_values_entirely() {
        let store = RecordStore::new(vec![
            obs(2024, None, Metric::Grp, None, Some(10.0)),
            obs(2024, None, Metric::Grp, None, None),
            obs(2024, None, Metric::Grp, None, Some(20.0)),
        ]);
        let request = AggregationRequest::new(vec![Metric::Grp], YearFilter::Single(2024))
            .with_mean();

        let rows = aggregate(&store, &request).unwrap();
        // Mean of {10, 20}, not {10, 0, 20}
        assert_eq!(rows[0].value, Some(15.0));
    }

    #[test]
    fn test_mean_counts_present_zero() {
        let store = RecordStore::new(vec![
            obs(2024, None, Metric::Grp, None, Some(0.0)),
            obs(2024, None, Metric::Grp, None, Some(30.0)),
        ]);
        let request = AggregationRequest::new(vec![Metric::Grp], YearFilter::Single(2024))
            .with_mean();

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows[0].value, Some(15.0));
    }

    #[test]
    fn test_mean_over_all_absent_values_is_none() {
        let store = RecordStore::new(vec![obs(2024, None, Metric::Grp, None, None)]);
        let request = AggregationRequest::new(vec![Metric::Grp], YearFilter::Single(2024))
            .with_mean();

        let rows = aggregate(&store, &request).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, None);
    }

    #[test]
    fn test_year_grouping_sorts_numerically() {
        let mut observations = Vec::new();
        for year in [2024, 2020, 2023, 2021, 2022] {
            observations.push(obs(year, None, Metric::Debt, None, Some(1.0)));
        }
        let store = RecordStore::new(observations);

        let request = AggregationRequest::new(
            vec![Metric::Debt],
            YearFilter::range(2020, 2024).unwrap(),
        )
        .with_group_by(vec![GroupField::Year]);

        let rows = aggregate(&store, &request).unwrap();
        let years: Vec<GroupKey> = rows.into_iter().map(|r| r.key[0].clone()).collect();
        assert_eq!(
            years,
            vec![
                GroupKey::Year(2020),
                GroupKey::Year(2021),
                GroupKey::Year(2022),
                GroupKey::Year(2023),
                GroupKey::Year(2024),
            ]
        );
    }

    #[test]
    fn test_grouping_by_nullable_field_drops_absent_rows() {
        let store = sample_store();
        let request = AggregationRequest::new(
            vec![Metric::Income, Metric::Expense, Metric::Debt],
            YearFilter::Single(2024),
        )
        .with_group_by(vec![GroupField::Region]);

        let rows = aggregate(&store, &request).unwrap();
        // The region-less Debt row contributes no partition
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key[0], GroupKey::Text("Andijan region".to_string()));
        assert_eq!(rows[1].key[0], GroupKey::Text("Bukhara region".to_string()));
    }

    #[test]
    fn test_unfiltered_grouped_sum_conserves_total() {
        let store = sample_store();
        let years = YearFilter::range(2023, 2024).unwrap();

        let total = aggregate(
            &store,
            &AggregationRequest::new(vec![Metric::Income], years),
        )
        .unwrap()[0]
            .value
            .unwrap();

        let grouped = aggregate(
            &store,
            &AggregationRequest::new(vec![Metric::Income], years)
                .with_group_by(vec![GroupField::Year]),
        )
        .unwrap();

        let regrouped: f64 = grouped.iter().filter_map(|r| r.value).sum();
        assert_eq!(total, regrouped);
    }

    #[test]
    fn test_unsorted_preserves_encounter_order() {
        let store = RecordStore::new(vec![
            obs(2024, Some("Samarkand region"), Metric::Income, None, Some(1.0)),
            obs(2024, Some("Andijan region"), Metric::Income, None, Some(2.0)),
        ]);
        let request = AggregationRequest::new(vec![Metric::Income], YearFilter::Single(2024))
            .with_group_by(vec![GroupField::Region]);

        let rows = aggregate_unsorted(&store, &request).unwrap();
        assert_eq!(rows[0].key[0], GroupKey::Text("Samarkand region".to_string()));
        assert_eq!(rows[1].key[0], GroupKey::Text("Andijan region".to_string()));
    }
}
