#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `civic_atlas` command-line tool.
//!
//! Loads the cleaned datasets from a data directory, runs one analysis,
//! and prints the result as pretty JSON on stdout. Diagnostics go to the
//! log; set `RUST_LOG=debug` to see them.

mod config;
mod data;

use std::path::PathBuf;

use civic_atlas_analytics::{
    DEFAULT_HOTSPOT_LIMIT, DEFAULT_WINDOW_DAYS, compute_kpis, detect_slow_hotspots,
    detect_volume_hotspots, kpis::ALL_CATEGORIES, moving_average, neighborhood_complaint_count,
    weather_insights,
};
use civic_atlas_complaints_models::Counts;
use civic_atlas_equity::{compute_equity_gaps, summarize_equity};
use civic_atlas_ingest::find_neighborhood;
use civic_atlas_neighborhood::{ReportCardInput, build_report_card};
use civic_atlas_neighborhood_models::ReportCard;
use civic_atlas_vacancy::{
    filter_properties, generate_vacancy_data, neighborhood_names, summarize_properties,
};
use civic_atlas_vacancy_models::{BestUse, Owner, PropertyFilter, PropertyType};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{Config, DATA_DIR_ENV};
use crate::data::DataDir;

#[derive(Parser)]
#[command(name = "civic_atlas", about = "St. Louis civic data analyses")]
struct Cli {
    /// Path to a `civic_atlas.toml` config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the cleaned datasets (overrides config and env)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transit-to-grocery equity gaps for low-income, low-access tracts
    Equity {
        /// Print the city-wide summary instead of per-tract results
        #[arg(long)]
        summary: bool,
    },
    /// Synthetic vacant-property inventory with triage scores
    Vacancy(VacancyArgs),
    /// Neighborhoods with unusually many or unusually slow 311 requests
    Hotspots {
        /// Maximum neighborhoods to report
        #[arg(long, default_value_t = DEFAULT_HOTSPOT_LIMIT)]
        limit: usize,

        /// Rank by resolution time instead of request volume
        #[arg(long)]
        slow: bool,
    },
    /// 311 volume on rainy, post-storm, and hot days
    Weather,
    /// City-wide 311 headline numbers
    Kpis,
    /// Trailing moving average of daily 311 requests
    MovingAverage {
        /// Window size in days
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        window: usize,
    },
    /// Combined transit, 311, food, and vacancy profile for a neighborhood
    ReportCard {
        /// Neighborhood number
        #[arg(long)]
        neighborhood: u32,
    },
    /// 311 requests in one neighborhood, optionally for one category
    Count {
        /// Neighborhood number
        #[arg(long)]
        neighborhood: u32,

        /// Category name, or "all" for the neighborhood total
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
}

#[derive(Args)]
struct VacancyArgs {
    /// Only this recommended use (housing, solar, garden)
    #[arg(long)]
    best_use: Option<BestUse>,

    /// Only this owner (LRA, CITY, PRIVATE)
    #[arg(long)]
    owner: Option<Owner>,

    /// Only buildings or only lots
    #[arg(long)]
    property_type: Option<PropertyType>,

    /// Only this neighborhood
    #[arg(long)]
    neighborhood: Option<String>,

    /// Minimum triage score
    #[arg(long, default_value_t = 0)]
    min_score: u8,

    /// Print summary counts instead of the properties
    #[arg(long, conflicts_with = "neighborhoods")]
    summary: bool,

    /// Print the neighborhood names present in the inventory
    #[arg(long)]
    neighborhoods: bool,
}

impl VacancyArgs {
    fn filter(self) -> PropertyFilter {
        PropertyFilter {
            best_use: self.best_use,
            owner: self.owner,
            property_type: self.property_type,
            neighborhood: self.neighborhood,
            min_score: self.min_score,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Unknown neighborhood {0}")]
    UnknownNeighborhood(u32),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyAverage<'a> {
    date: &'a str,
    count: u64,
    average: Option<u64>,
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    let root = config.resolve_data_dir(env_dir, cli.data_dir);
    log::debug!("Using data directory {}", root.display());
    let data = DataDir::new(root, config.files);

    match cli.command {
        Commands::Equity { summary } => {
            let tracts = data.tracts()?;
            let stops = data.stops()?;
            let stop_stats = data.stop_stats()?;
            let groceries = data.groceries()?;

            let results = compute_equity_gaps(&tracts, &stops, &stop_stats, &groceries);
            if summary {
                print_json(&summarize_equity(&tracts, &results))?;
            } else {
                print_json(&results)?;
            }
        }
        Commands::Vacancy(args) => vacancy(args)?,
        Commands::Hotspots { limit, slow } => {
            let complaints = data.complaints()?;
            let hotspots = if slow {
                detect_slow_hotspots(&complaints, limit)
            } else {
                detect_volume_hotspots(&complaints, limit)
            };
            print_json(&hotspots)?;
        }
        Commands::Weather => {
            let complaints = data.complaints()?;
            let trends = data.trends()?;
            print_json(&weather_insights(&complaints.daily_counts, &trends.weather))?;
        }
        Commands::Kpis => {
            let complaints = data.complaints()?;
            let kpis = compute_kpis(&complaints);
            if kpis.is_none() {
                log::warn!("No daily counts for {}; KPIs unavailable", complaints.year);
            }
            print_json(&kpis)?;
        }
        Commands::MovingAverage { window } => {
            let complaints = data.complaints()?;
            print_json(&daily_averages(&complaints.daily_counts, window))?;
        }
        Commands::ReportCard { neighborhood } => {
            print_json(&report_card(&data, neighborhood)?)?;
        }
        Commands::Count {
            neighborhood,
            category,
        } => {
            let complaints = data.complaints()?;
            print_json(&neighborhood_complaint_count(
                &complaints,
                neighborhood,
                &category,
            ))?;
        }
    }

    Ok(())
}

fn vacancy(args: VacancyArgs) -> Result<(), serde_json::Error> {
    let properties = generate_vacancy_data();
    if args.neighborhoods {
        return print_json(&neighborhood_names(&properties));
    }

    let summary = args.summary;
    let filter = args.filter();
    let matching = filter_properties(&properties, &filter);
    log::info!("{} of {} properties match", matching.len(), properties.len());

    if summary {
        print_json(&summarize_properties(matching))
    } else {
        print_json(&matching)
    }
}

fn daily_averages(daily: &Counts, window: usize) -> Vec<DailyAverage<'_>> {
    let counts: Vec<u64> = daily.values().copied().collect();

    daily
        .iter()
        .zip(moving_average(&counts, window))
        .map(|((date, count), average)| DailyAverage {
            date,
            count: *count,
            average,
        })
        .collect()
}

fn report_card(data: &DataDir, number: u32) -> Result<ReportCard, Box<dyn std::error::Error>> {
    let boundaries = data.neighborhoods()?;
    let complaints = data.complaints()?;
    let boundary = find_neighborhood(&boundaries, number);
    let stats = complaints.neighborhoods.get(&format!("{number:02}"));

    let name = boundary
        .map(|b| b.name.as_str())
        .or_else(|| stats.map(|s| s.name.as_str()))
        .ok_or(CliError::UnknownNeighborhood(number))?;
    if boundary.is_none() {
        log::warn!("No boundary for {name}; measuring from the city center");
    }

    let stops = data.stops()?;
    let stop_stats = data.stop_stats()?;
    let routes = data.routes()?;
    let groceries = data.groceries()?;
    let tracts = data.tracts()?;
    let properties = generate_vacancy_data();

    Ok(build_report_card(&ReportCardInput {
        number,
        name,
        boundary: boundary.map(|b| &b.geometry),
        complaints: stats,
        stops: &stops,
        stop_stats: &stop_stats,
        routes: &routes,
        groceries: &groceries,
        tracts: &tracts,
        properties: &properties,
    })?)
}
