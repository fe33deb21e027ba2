//! Composed pipeline calls, one per dashboard visual.
//!
//! Each function here builds one or more `AggregationRequest`s, runs
//! them through the engine, and returns a shape the presentation
//! adapters can render directly:
//! - KPI cards (six scalars for one year)
//! - Income/expenditure trend by year
//! - Income/expenditure breakdown by region
//! - Per-region map values for GRP / GRP per capita
//! - Top creditor ranking (or the synthetic Total row)
//! - Public debt trend across all years

use crate::pipeline::aggregate::{aggregate, aggregate_unsorted, GroupKey, ResultRow};
use crate::pipeline::request::{AggregationRequest, GroupField, YearFilter};
use crate::store::{Metric, RecordStore};
use crate::utils::config::TOP_CREDITORS;
use crate::utils::error::RequestError;
use log::debug;

/// The six headline indicators for one year.
///
/// Each scalar is absent when its slice matched zero rows (or, for
/// the means, when every matched value was missing); the renderer
/// shows a placeholder rather than a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub year: i32,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub net: Option<f64>,
    pub avg_grp: Option<f64>,
    pub avg_grp_per_capita: Option<f64>,
    pub public_debt: Option<f64>,
}

/// One region's summed value, ready for the choropleth join
#[derive(Debug, Clone, PartialEq)]
pub struct RegionValue {
    pub region: String,
    pub value: f64,
}

/// One row of the creditor ranking table
#[derive(Debug, Clone, PartialEq)]
pub struct CreditorRow {
    pub creditor: String,
    pub value: f64,
}

/// Top creditors for one year.
///
/// `synthetic_total` marks the degenerate case where the loaded data
/// has no creditor dimension and the single row is the year's grand
/// sum labeled "Total".
#[derive(Debug, Clone, PartialEq)]
pub struct CreditorRanking {
    pub year: i32,
    pub rows: Vec<CreditorRow>,
    pub synthetic_total: bool,
}

/// Compute the six KPI scalars for one year
///
/// **Public** - backs the KPI card row
///
/// Income, expenditure, and net balance are sums over sector-tagged
/// rows; GRP and GRP per capita are arithmetic means; public debt is
/// a plain sum. Net balance is income minus expenditure, absent only
/// when both sides matched zero rows.
pub fn kpi_summary(store: &RecordStore, year: i32) -> Result<KpiSummary, RequestError> {
    let income = scalar(
        store,
        AggregationRequest::new(vec![Metric::Income], YearFilter::Single(year))
            .with_sector_required(),
    )?;
    let expense = scalar(
        store,
        AggregationRequest::new(vec![Metric::Expense], YearFilter::Single(year))
            .with_sector_required(),
    )?;

    let net = match (income, expense) {
        (None, None) => None,
        (income, expense) => Some(income.unwrap_or(0.0) - expense.unwrap_or(0.0)),
    };

    let avg_grp = scalar(
        store,
        AggregationRequest::new(vec![Metric::Grp], YearFilter::Single(year)).with_mean(),
    )?;
    let avg_grp_per_capita = scalar(
        store,
        AggregationRequest::new(vec![Metric::GrpPerCapita], YearFilter::Single(year))
            .with_mean(),
    )?;
    let public_debt = scalar(
        store,
        AggregationRequest::new(vec![Metric::Debt], YearFilter::Single(year)),
    )?;

    Ok(KpiSummary {
        year,
        income,
        expense,
        net,
        avg_grp,
        avg_grp_per_capita,
        public_debt,
    })
}

/// Income and expenditure summed per year over an inclusive range
///
/// **Public** - backs the trend line chart
///
/// Rows without a sector are excluded (sector-tagged rows are the
/// budget execution records; the untagged remainder are memo items).
/// Result is grouped by (year, metric) and sorted by year,
/// numerically.
pub fn budget_series(
    store: &RecordStore,
    start: i32,
    end: i32,
) -> Result<Vec<ResultRow>, RequestError> {
    let request = AggregationRequest::new(
        vec![Metric::Income, Metric::Expense],
        YearFilter::range(start, end)?,
    )
    .with_sector_required()
    .with_group_by(vec![GroupField::Year, GroupField::Metric]);

    aggregate(store, &request)
}

/// Income and expenditure summed per region for one year
///
/// **Public** - backs the by-region area chart
///
/// An empty `regions` slice means all regions. Rows without a region
/// fall out of the grouping; result is sorted by region name.
pub fn region_breakdown(
    store: &RecordStore,
    year: i32,
    regions: &[String],
) -> Result<Vec<ResultRow>, RequestError> {
    let request = AggregationRequest::new(
        vec![Metric::Income, Metric::Expense],
        YearFilter::Single(year),
    )
    .with_regions(regions.to_vec())
    .with_group_by(vec![GroupField::Region, GroupField::Metric]);

    aggregate(store, &request)
}

/// Per-region summed value for the choropleth map
///
/// **Public** - backs the map view
///
/// # Errors
/// * `RequestError::MetricNotMappable` - only GRP and GRP per capita
///   are drawn on the map
pub fn map_values(
    store: &RecordStore,
    year: i32,
    metric: Metric,
) -> Result<Vec<RegionValue>, RequestError> {
    if !matches!(metric, Metric::Grp | Metric::GrpPerCapita) {
        return Err(RequestError::MetricNotMappable(metric.code().to_string()));
    }

    let request = AggregationRequest::new(vec![metric], YearFilter::Single(year))
        .with_group_by(vec![GroupField::Region]);

    let rows = aggregate(store, &request)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match row.key.into_iter().next() {
            Some(GroupKey::Text(region)) => Some(RegionValue {
                region,
                value: row.value.unwrap_or(0.0),
            }),
            _ => None,
        })
        .collect())
}

/// Rank creditors by summed debt for one year, largest first
///
/// **Public** - backs the creditor table
///
/// Rows without a creditor are excluded from the ranking. The sort is
/// stable, so creditors with equal sums keep the order in which they
/// first appear in the data. When the loaded data carries no creditor
/// dimension at all, the table degrades to one synthetic "Total" row
/// holding the year's grand sum.
pub fn top_creditors(store: &RecordStore, year: i32) -> Result<CreditorRanking, RequestError> {
    if !store.has_creditor_dimension() {
        debug!("No creditor dimension in data, returning grand total for {}", year);
        let total = scalar(
            store,
            AggregationRequest::new(vec![Metric::Debt], YearFilter::Single(year)),
        )?;
        return Ok(CreditorRanking {
            year,
            rows: vec![CreditorRow {
                creditor: "Total".to_string(),
                value: total.unwrap_or(0.0),
            }],
            synthetic_total: true,
        });
    }

    let request = AggregationRequest::new(vec![Metric::Debt], YearFilter::Single(year))
        .with_group_by(vec![GroupField::Creditor]);

    // Encounter order in, stable sort by value: ties keep their
    // original relative order
    let mut rows = aggregate_unsorted(store, &request)?;
    rows.sort_by(|a, b| {
        b.value
            .unwrap_or(0.0)
            .partial_cmp(&a.value.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(TOP_CREDITORS);

    Ok(CreditorRanking {
        year,
        rows: rows
            .into_iter()
            .filter_map(|row| match row.key.into_iter().next() {
                Some(GroupKey::Text(creditor)) => Some(CreditorRow {
                    creditor,
                    value: row.value.unwrap_or(0.0),
                }),
                _ => None,
            })
            .collect(),
        synthetic_total: false,
    })
}

/// Public debt summed per year, across every year in the data
///
/// **Public** - backs the debt trend chart
pub fn debt_trend(store: &RecordStore) -> Result<Vec<ResultRow>, RequestError> {
    let years = store.years();
    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        return Ok(Vec::new());
    };

    let request = AggregationRequest::new(vec![Metric::Debt], YearFilter::range(first, last)?)
        .with_group_by(vec![GroupField::Year]);

    aggregate(store, &request)
}

/// Collapse a no-grouping aggregation into its single scalar.
///
/// Empty result (no matching rows) maps to `None`.
fn scalar(store: &RecordStore, request: AggregationRequest) -> Result<Option<f64>, RequestError> {
    let rows = aggregate(store, &request)?;
    Ok(rows.into_iter().next().and_then(|row| row.value))
}
