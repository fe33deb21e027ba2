//! UzMacro Insights CLI
//!
//! Query tool for Uzbekistan's regional macroeconomic indicators.
//! Loads the observation table and answers one dashboard question
//! per subcommand: KPI cards, trends, regional breakdowns, the
//! choropleth map, and the creditor table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use uzmacro_insights::commands::{
    execute_creditors, execute_debt_trend, execute_kpi, execute_map, execute_regions,
    execute_series, CreditorArgs, KpiArgs, MapArgs, RegionArgs, SeriesArgs, TrendArgs,
};
use uzmacro_insights::store::{load_records, Metric};
use uzmacro_insights::utils::config::{
    DEFAULT_BOUNDARY_FILE, DEFAULT_DATA_FILE, SCHEMA_VERSION,
};

/// UzMacro Insights - macroeconomic indicators by year and region
#[derive(Parser, Debug)]
#[command(name = "uzmacro")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Headline indicators for one year
    Kpi {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Year to summarize (defaults to the latest year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budget income and expenditure trend over a year range
    Series {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Range start (defaults to the earliest year)
        #[arg(long)]
        from: Option<i32>,

        /// Range end (defaults to the latest year)
        #[arg(long)]
        to: Option<i32>,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budget income and expenditure by region for one year
    Regions {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Year to break down (defaults to the latest year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Region to include; repeat for several, omit for all
        #[arg(short, long = "region")]
        regions: Vec<String>,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-region GRP or GRP per capita joined to boundary polygons
    Map {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Boundary polygons (GeoJSON)
        #[arg(short, long, default_value = DEFAULT_BOUNDARY_FILE)]
        boundaries: PathBuf,

        /// Year to map (defaults to the latest year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Metric to color by: grp or grp_pc
        #[arg(short, long, default_value = "grp")]
        metric: String,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Top 10 debt providers for one year
    Creditors {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Year to rank (defaults to the latest year with debt data)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Public debt summed per year, across all years
    DebtTrend {
        /// Observation table (CSV)
        #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
        data: PathBuf,

        /// Output path for the JSON document (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate an observation table and report its shape
    Validate {
        /// Path to the observation table (CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Kpi { data, year, output } => {
            execute_kpi(KpiArgs {
                data_file: data,
                year,
                output,
            })?;
        }

        Commands::Series {
            data,
            from,
            to,
            output,
        } => {
            execute_series(SeriesArgs {
                data_file: data,
                from,
                to,
                output,
            })?;
        }

        Commands::Regions {
            data,
            year,
            regions,
            output,
        } => {
            execute_regions(RegionArgs {
                data_file: data,
                year,
                regions,
                output,
            })?;
        }

        Commands::Map {
            data,
            boundaries,
            year,
            metric,
            output,
        } => {
            execute_map(MapArgs {
                data_file: data,
                boundary_file: boundaries,
                year,
                metric,
                output,
            })?;
        }

        Commands::Creditors { data, year, output } => {
            execute_creditors(CreditorArgs {
                data_file: data,
                year,
                output,
            })?;
        }

        Commands::DebtTrend { data, output } => {
            execute_debt_trend(TrendArgs {
                data_file: data,
                output,
            })?;
        }

        Commands::Validate { file } => {
            validate_dataset(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate an observation table file
///
/// **Private** - internal command implementation
fn validate_dataset(file_path: PathBuf) -> Result<()> {
    println!("Validating dataset: {}", file_path.display());

    let store = load_records(&file_path)?;
    let years = store.years();

    println!("✓ Valid observation table");
    println!("  Rows: {}", store.len());
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        println!("  Years: {}–{}", first, last);
    }
    println!("  Regions: {}", store.regions().len());
    println!(
        "  Creditor dimension: {}",
        if store.has_creditor_dimension() {
            "present"
        } else {
            "absent"
        }
    );

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("UzMacro Insights Observation Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Observation Columns:");
        println!("  Year: integer      - always present");
        println!("  Region: string     - optional; trimmed at load");
        println!("  Metric: string     - one of the catalog labels");
        println!("  Sector: string     - optional budget dimension");
        println!("  Creditor: string   - optional debt dimension");
        println!("  Value: number      - optional; 0 in sums, excluded from means");
        println!();
        println!("Metric Catalog:");
        for metric in Metric::ALL {
            println!("  {:8} - {}", metric.code(), metric.label());
        }
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("UzMacro Insights v{}", env!("CARGO_PKG_VERSION"));
    println!("Document Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Macroeconomic indicators for the regions of Uzbekistan.");
}
