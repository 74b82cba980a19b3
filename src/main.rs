use analytics::{AnalyticsEngine, AnalyticsError, SummaryReport};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::{DateRange, Dataset};
use registry::DatasetRepository;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the Trendline application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                config.server.port = port;
            }
            let repo = web_server::seeded_repository(&config)?;
            web_server::run_server(config, Arc::new(repo)).await
        }
        Commands::Inspect(args) => handle_inspect(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive statistics, trends and correlations over dated datasets.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to `trendline.toml` if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Print a summary table for one of the seeded datasets.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.port` from the configuration.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct InspectArgs {
    /// The dataset to summarise (e.g., "weather").
    #[arg(long)]
    dataset: String,

    /// Inclusive start date (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Inclusive end date (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

// ==============================================================================
// Inspect Command Logic
// ==============================================================================

fn handle_inspect(args: InspectArgs, config: &Config) -> anyhow::Result<()> {
    let repo = web_server::seeded_repository(config)?;
    let dataset = repo.get(&args.dataset)?;
    let range = DateRange::new(args.from, args.to);
    tracing::debug!(dataset = %args.dataset, ?range, "Inspecting dataset.");

    println!("{}: {}", dataset.id(), dataset.description());
    println!("{}", summary_table(&dataset, range, config.analysis.display_precision)?);
    Ok(())
}

/// One row per parameter. Parameters with no values in range are shown with dashes.
fn summary_table(dataset: &Dataset, range: DateRange, digits: u32) -> anyhow::Result<Table> {
    let engine = AnalyticsEngine::new();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Parameter", "Count", "Mean", "Median", "Std Dev", "Min", "Max", "Anomalies",
    ]);

    for (param, name) in dataset.schema().iter() {
        match engine.summary(dataset, param, range) {
            Ok(report) => {
                table.add_row(summary_row(name, &report.rounded(digits)));
            }
            Err(AnalyticsError::NoData) => {
                let mut row = vec![Cell::new(name), Cell::new(0)];
                row.extend((0..6).map(|_| Cell::new("-")));
                table.add_row(row);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(table)
}

fn summary_row(name: &str, report: &SummaryReport) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(report.count),
        Cell::new(report.mean),
        Cell::new(report.median),
        Cell::new(report.stddev),
        Cell::new(report.min),
        Cell::new(report.max),
        Cell::new(report.anomalies),
    ]
}
