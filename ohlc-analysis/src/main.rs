//! OHLC Analysis CLI
//!
//! # Usage
//!
//! ```bash
//! # Day-type distribution and return statistics
//! ohlc-analysis summary --data data/spy_daily.csv
//!
//! # Same report as JSON, with custom column names
//! ohlc-analysis summary --data data/spy_daily.csv --config config/default.toml --json
//!
//! # List the first 5 red days
//! ohlc-analysis classify --data data/spy_daily.csv --day-type red --limit 5
//!
//! # Check the file for zero opens, bad High/Low and date order
//! ohlc-analysis validate --data data/spy_daily.csv
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ohlc_analysis::{
    Config, DayType, OhlcAnalyzer, PriceLoader, PriceTable, TableIntegrityValidator,
};

const SEPARATOR: &str = "============================================================";

#[derive(Parser)]
#[command(name = "ohlc-analysis")]
#[command(about = "Classify daily OHLC bars and summarise their returns")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print day-type distribution and return statistics
    Summary {
        /// Path to CSV price file
        #[arg(short, long)]
        data: String,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print each session with its day type
    Classify {
        /// Path to CSV price file
        #[arg(short, long)]
        data: String,

        /// Only show sessions of this type (green, red, neutral)
        #[arg(long)]
        day_type: Option<DayType>,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run integrity checks on a price file
    Validate {
        /// Path to CSV price file
        #[arg(short, long)]
        data: String,
    },
}

fn load_table(config: &Config, data: &str) -> Result<PriceTable> {
    PriceLoader::new(config.loader.clone())
        .load_csv(data)
        .with_context(|| format!("Failed to load price data from {}", data))
}

fn cmd_summary(config: &Config, data: &str, json: bool) -> Result<()> {
    let table = load_table(config, data)?;
    let report = OhlcAnalyzer::new(config.analysis.clone())
        .analyze(&table)
        .context("Analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

fn cmd_classify(
    config: &Config,
    data: &str,
    day_type: Option<DayType>,
    limit: Option<usize>,
) -> Result<()> {
    let table = load_table(config, data)?;
    let labeled = OhlcAnalyzer::new(config.analysis.clone()).classify(&table);
    let limit = limit.unwrap_or(usize::MAX);

    let rows = labeled
        .iter()
        .enumerate()
        .filter(|(_, (_, label))| day_type.map_or(true, |t| t == *label))
        .take(limit);

    println!("{:>6}  {:<10}  {:>12}  {:>12}  {:<7}", "row", "date", "open", "close", "type");
    println!("{}", SEPARATOR);
    for (row, (bar, label)) in rows {
        let date = bar.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {:<10}  {:>12.4}  {:>12.4}  {:<7}",
            row, date, bar.open, bar.close, label
        );
    }

    let counts = labeled.counts();
    let dist = labeled.distribution();
    println!("{}", SEPARATOR);
    println!(
        "green: {} ({:.2}%)  red: {} ({:.2}%)  neutral: {} ({:.2}%)",
        counts.green, dist.green, counts.red, dist.red, counts.neutral, dist.neutral
    );
    Ok(())
}

fn cmd_validate(config: &Config, data: &str) -> Result<bool> {
    let table = load_table(config, data)?;
    let report = TableIntegrityValidator::new().validate(&table);

    println!("{}", report.summary());
    println!("{}", SEPARATOR);
    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", status, check.name, check.message);
        if let Some(details) = &check.details {
            println!("       {}", details);
        }
    }
    Ok(report.all_passed())
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ohlc_analysis=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Summary { data, json } => cmd_summary(&config, &data, json)?,
        Commands::Classify {
            data,
            day_type,
            limit,
        } => cmd_classify(&config, &data, day_type, limit)?,
        Commands::Validate { data } => {
            if !cmd_validate(&config, &data)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
