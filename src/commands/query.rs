//! Query command implementations.
//!
//! Every command follows the same shape:
//! 1. Load the observation table
//! 2. Resolve defaults (most queries default to the latest year)
//! 3. Run the pipeline view
//! 4. Print a text table, and write a JSON document if requested

use crate::commands::models::{
    CreditorArgs, KpiArgs, MapArgs, RegionArgs, SeriesArgs, TrendArgs,
};
use crate::geo::{join_map_values, load_boundaries};
use crate::output::json::{
    CreditorDocument, KpiDocument, MapDocument, RegionDocument, SeriesDocument,
};
use crate::output::table::{format_value, render_table};
use crate::output::write_document;
use crate::pipeline::aggregate::GroupKey;
use crate::pipeline::views::{
    budget_series, debt_trend, kpi_summary, map_values, region_breakdown, top_creditors,
};
use crate::store::{load_records, Metric, RecordStore};
use anyhow::{bail, Context, Result};
use log::info;
use std::path::Path;

/// Execute the KPI card query
///
/// **Public** - main entry point called from main.rs
pub fn execute_kpi(args: KpiArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;
    let year = resolve_year(&store, args.year)?;

    let summary = kpi_summary(&store, year).context("Failed to compute KPI summary")?;

    println!("Main Macroeconomic Indicators — {}", year);
    println!();
    let rows = vec![
        vec![
            "Budget Income (bln UZS)".to_string(),
            format_value(summary.income),
        ],
        vec![
            "Budget Expenditure (bln UZS)".to_string(),
            format_value(summary.expense),
        ],
        vec!["Net Balance (bln UZS)".to_string(), format_value(summary.net)],
        vec!["Average GRP (bln UZS)".to_string(), format_value(summary.avg_grp)],
        vec![
            "GRP per Capita (ths UZS)".to_string(),
            format_value(summary.avg_grp_per_capita),
        ],
        vec![
            "Public Debt (mln USD)".to_string(),
            format_value(summary.public_debt),
        ],
    ];
    print!("{}", render_table(&["Indicator", "Value"], &rows));

    if let Some(path) = &args.output {
        write_document(&KpiDocument::from_summary(&summary), path)
            .context("Failed to write KPI document")?;
        info!("✓ KPI document written to: {}", path.display());
    }

    Ok(())
}

/// Execute the income/expenditure trend query
pub fn execute_series(args: SeriesArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;

    let years = store.years();
    let from = args.from.unwrap_or_else(|| years[0]);
    let to = args.to.unwrap_or_else(|| years[years.len() - 1]);

    let rows = budget_series(&store, from, to).context("Failed to compute budget series")?;

    println!("Budget Income and Expenditure, {}–{}", from, to);
    println!();
    print_keyed_rows(&["Year", "Metric", "Value"], &rows);

    if let Some(path) = &args.output {
        let title = format!("Trend of Budget Income and Budget Expenditure {}–{}", from, to);
        write_document(&SeriesDocument::from_rows(title, &rows), path)
            .context("Failed to write series document")?;
        info!("✓ Series document written to: {}", path.display());
    }

    Ok(())
}

/// Execute the by-region breakdown query
pub fn execute_regions(args: RegionArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;
    let year = resolve_year(&store, args.year)?;

    let rows = region_breakdown(&store, year, &args.regions)
        .context("Failed to compute region breakdown")?;

    println!("Budget Income and Expenditure by Region — {}", year);
    println!();
    print_keyed_rows(&["Region", "Metric", "Value"], &rows);

    if let Some(path) = &args.output {
        let title = format!("State Budget Income and Expenditure by Region ({})", year);
        write_document(&RegionDocument::from_rows(title, year, &rows), path)
            .context("Failed to write region document")?;
        info!("✓ Region document written to: {}", path.display());
    }

    Ok(())
}

/// Execute the choropleth map query
pub fn execute_map(args: MapArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;
    let year = resolve_year(&store, args.year)?;
    let metric = Metric::from_code(&args.metric)?;

    let values = map_values(&store, year, metric)?;
    let boundaries = load_boundaries(&args.boundary_file).with_context(|| {
        format!("Failed to load boundaries from {}", args.boundary_file.display())
    })?;

    let join = join_map_values(&boundaries, &values);

    println!("Uzbekistan — {} by Region ({})", metric.label(), year);
    println!();
    let table_rows: Vec<Vec<String>> = join
        .rows
        .iter()
        .map(|v| vec![v.region.clone(), format_value(Some(v.value))])
        .collect();
    print!("{}", render_table(&["Region", "Value"], &table_rows));
    println!();
    println!(
        "Joined {} of {} polygons ({} data regions unmatched, {} polygons unfilled)",
        join.rows.len(),
        boundaries.len(),
        join.unmatched_data.len(),
        join.unfilled_boundaries.len()
    );

    if let Some(path) = &args.output {
        let document =
            MapDocument::new(year, metric.label(), &join.rows, join.unfilled_boundaries);
        write_document(&document, path).context("Failed to write map document")?;
        info!("✓ Map document written to: {}", path.display());
    }

    Ok(())
}

/// Execute the top-creditor table query
pub fn execute_creditors(args: CreditorArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;

    // The creditor table defaults to the latest year that actually
    // carries Debt rows, not the latest year overall
    let year = match args.year {
        Some(year) => year,
        None => match store.debt_years().last() {
            Some(&year) => year,
            None => resolve_year(&store, None)?,
        },
    };

    let ranking = top_creditors(&store, year).context("Failed to rank creditors")?;

    println!("Top Debt Providers — {}", year);
    println!();
    let rows: Vec<Vec<String>> = ranking
        .rows
        .iter()
        .map(|r| vec![r.creditor.clone(), format_value(Some(r.value))])
        .collect();
    print!("{}", render_table(&["Creditor", "Amount (mln USD)"], &rows));

    if let Some(path) = &args.output {
        write_document(&CreditorDocument::from_ranking(&ranking), path)
            .context("Failed to write creditor document")?;
        info!("✓ Creditor document written to: {}", path.display());
    }

    Ok(())
}

/// Execute the public-debt trend query
pub fn execute_debt_trend(args: TrendArgs) -> Result<()> {
    let store = load_store(&args.data_file)?;

    let rows = debt_trend(&store).context("Failed to compute debt trend")?;

    println!("Public Debt — Trend Over Time (mln USD)");
    println!();
    print_keyed_rows(&["Year", "Value"], &rows);

    if let Some(path) = &args.output {
        write_document(
            &SeriesDocument::from_rows("Public Debt — Trend Over Time", &rows),
            path,
        )
        .context("Failed to write debt trend document")?;
        info!("✓ Debt trend document written to: {}", path.display());
    }

    Ok(())
}

/// Load the observation table with context attached
fn load_store(path: &Path) -> Result<RecordStore> {
    load_records(path)
        .with_context(|| format!("Failed to load observations from {}", path.display()))
}

/// Resolve an optional year to the latest year in the data
fn resolve_year(store: &RecordStore, year: Option<i32>) -> Result<i32> {
    match year.or_else(|| store.latest_year()) {
        Some(year) => Ok(year),
        None => bail!("Dataset contains no years"),
    }
}

/// Print pipeline rows as a table: key components, then the value
fn print_keyed_rows(headers: &[&str], rows: &[crate::pipeline::aggregate::ResultRow]) {
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.key.iter().map(GroupKey::to_string).collect();
            cells.push(format_value(row.value));
            cells
        })
        .collect();

    if table_rows.is_empty() {
        println!("(no matching data)");
    } else {
        print!("{}", render_table(headers, &table_rows));
    }
}
