//! Earthquake Catalogue Report CLI
//!
//! Loads the NEIC catalogue into DuckDB and prints the selected reports.

mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, LogFormat, OutputFormat};
use quake_analytics::reports::DEFAULT_YEAR_OF_INTEREST;
use quake_analytics::{DuckDbSource, ExecutionContext, ReportDriver, ReportParams, Selection};
use quake_domain::TableName;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "quake-report")]
#[command(about = "Descriptive statistics over the NEIC earthquake catalogue")]
struct Args {
    /// Run every report
    #[arg(long)]
    all: bool,

    /// Run a single report (1-9)
    #[arg(long)]
    question_num: Option<i64>,

    /// Year examined by report 2
    #[arg(long, default_value_t = DEFAULT_YEAR_OF_INTEREST)]
    year_of_interest: i32,

    /// Catalogue CSV to ingest before reporting
    #[arg(long)]
    csv: Option<PathBuf>,

    /// DuckDB database file (in-memory when omitted)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Catalogue table name
    #[arg(long)]
    table: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Compute reports on parallel threads
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(ref database) = self.database {
            config.database = Some(database.clone());
        }
        if let Some(ref table) = self.table {
            config.table = table.clone();
        }
        if let Some(ref csv) = self.csv {
            config.csv = Some(csv.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.apply(Config::from_env());
    init_tracing(&config);

    let selection = Selection::from_flags(args.all, args.question_num);
    if selection == Selection::Nothing {
        info!("No report selected");
        return Ok(());
    }

    let table = TableName::parse(&config.table)?;
    let mut store = match config.database {
        Some(ref path) => DuckDbSource::new_persistent(path, table)
            .with_context(|| format!("opening database {}", path.display()))?,
        None => DuckDbSource::new_in_memory(table)?,
    };

    if let Some(ref csv) = config.csv {
        let summary = store
            .import_csv(csv)
            .with_context(|| format!("importing {}", csv.display()))?;
        info!(
            table = %store.table(),
            rows = summary.rows,
            missing_dates = summary.missing_dates,
            coerced_cells = summary.coerced_cells,
            "Catalogue imported"
        );
    }

    let ctx = ExecutionContext::load(&store).context("loading catalogue")?;
    let driver = ReportDriver::new(ReportParams {
        year_of_interest: args.year_of_interest,
    });
    let outputs = if args.parallel {
        driver.run_parallel(&ctx, selection)
    } else {
        driver.run(&ctx, selection)
    };

    info!(
        run_id = %ctx.run_id(),
        year_of_interest = driver.params().year_of_interest,
        reports = outputs.len(),
        "Reports complete"
    );
    print!("{}", render::render(&outputs, config.format)?);

    Ok(())
}
