//! Area-match command line.
//!
//! Suggests canonical areas for raw order references, scores names against
//! each other and prints the curtain reorder dashboard. Output is JSON on
//! stdout; logs go to stderr (`RUST_LOG` overrides the `info` default).

mod job;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use area_match_core::models::{AreaOrder, ExistingArea};
use area_match_core::reorder::parse_order_date;
use area_match_core::{matcher, reorder_dashboard, AreaMatcher, MatcherConfig};

use job::{read_json, BatchJob};

#[derive(Parser)]
#[command(name = "area-match")]
#[command(about = "Hospital area-name suggestion and reorder scheduling")]
struct Cli {
    /// Matcher config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest an area for one raw reference
    Suggest {
        /// Hospital name
        #[arg(long)]
        hospital: String,
        /// Existing areas for the hospital (JSON array)
        #[arg(long)]
        areas: Option<PathBuf>,
        /// Raw reference text
        text: Option<String>,
    },
    /// Suggest areas for a batch job file
    Batch {
        /// Job file with hospitals, areas and purchases (JSON)
        job: PathBuf,
    },
    /// Print the canonical name for a new area
    Format {
        /// Hospital name
        #[arg(long)]
        hospital: String,
        /// Raw reference text
        text: String,
    },
    /// Score two area names against each other
    Score { a: String, b: String },
    /// Print the reorder dashboard for an order history file
    Reorder {
        /// Order history (JSON array)
        orders: PathBuf,
        /// Date to schedule from (YYYY-MM-DD or dd/mm/yyyy); defaults to today
        #[arg(long)]
        today: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MatcherConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MatcherConfig::default(),
    };
    let matcher = AreaMatcher::with_config(config);

    match cli.command {
        Commands::Suggest {
            hospital,
            areas,
            text,
        } => {
            let existing: Vec<ExistingArea> = match areas {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let suggestion = matcher.suggest_area(text.as_deref(), &existing, &hospital);
            print_json(&suggestion)?;
        }
        Commands::Batch { job } => {
            let job = BatchJob::from_file(&job)?;
            let results = job.run(&matcher);
            info!(
                purchases = job.purchases.len(),
                suggested = results.values().filter(|s| s.is_some()).count(),
                "Batch complete"
            );
            print_json(&results)?;
        }
        Commands::Format { hospital, text } => {
            println!("{}", matcher.format_new_area_suggestion(&text, &hospital));
        }
        Commands::Score { a, b } => {
            println!("{}", matcher::calculate_similarity(&a, &b));
        }
        Commands::Reorder { orders, today } => {
            let today = match today {
                Some(raw) => parse_order_date(&raw)?,
                None => chrono::Local::now().date_naive(),
            };
            let orders: Vec<AreaOrder> = read_json(&orders)?;
            let dashboard = reorder_dashboard(&orders, &matcher.config().reorder, today);
            info!(
                areas = dashboard.len(),
                attention = dashboard
                    .iter()
                    .filter(|e| e.status.needs_attention())
                    .count(),
                %today,
                "Reorder dashboard"
            );
            print_json(&dashboard)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
