//! `trailplanner` command line interface

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error};

use trailplanner::{
    LocationCode, TrailFilter, TrailPlannerConfig, TrailPlannerError, TripWindow, VisitPlanner,
};

#[derive(Debug, Parser)]
#[command(
    name = "trailplanner",
    version,
    about = "Park, trail and weather aggregation for planning outdoor visits"
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "path")]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Map a park code to its recreation area id
    Resolve {
        /// Park code, e.g. yose
        code: String,
    },
    /// List the trails of a park
    Trails {
        code: String,
        /// Case-insensitive substring of the difficulty
        #[arg(long)]
        difficulty: Option<String>,
        /// Minimum length in miles
        #[arg(long, value_name = "miles")]
        min_length: Option<f64>,
        /// Maximum length in miles
        #[arg(long, value_name = "miles")]
        max_length: Option<f64>,
        /// Exact facility id
        #[arg(long)]
        id: Option<String>,
    },
    /// Compose a visit report with alerts, events, campgrounds and forecast
    Plan {
        code: String,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        match e.downcast_ref::<TrailPlannerError>() {
            Some(planner_error) => {
                error!("{:#}", e);
                eprintln!("trailplanner: {}", planner_error.user_message());
            }
            None => eprintln!("trailplanner: {e:#}"),
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = TrailPlannerConfig::load_from_path(cli.config)?;
    trailplanner::logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config.aggregation);

    let planner = VisitPlanner::from_config(&config)?;
    let scope = planner.scope();

    match cli.command {
        Command::Resolve { code } => {
            let resolution = planner.resolve(&LocationCode::new(&code)).await?;
            print_json(&resolution)
        }
        Command::Trails {
            code,
            difficulty,
            min_length,
            max_length,
            id,
        } => {
            let filter = TrailFilter {
                id,
                difficulty,
                min_length,
                max_length,
            };
            let trails = planner
                .trails_for_code(&LocationCode::new(&code), &filter, &scope)
                .await?;
            print_json(&trails)
        }
        Command::Plan { code, start, end } => {
            let trip = match (start, end) {
                (Some(start), Some(end)) => Some(TripWindow::new(start, end)?),
                _ => None,
            };
            let report = planner
                .plan_visit(&LocationCode::new(&code), trip, &scope)
                .await?;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
