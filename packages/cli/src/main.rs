#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the USF COVID-19 case tools.

mod output;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use usf_covid_analytics::aggregate::{daily_aggregate, daily_average_by_occupation, total_cases};
use usf_covid_analytics::trend::{DEFAULT_WINDOW_DAYS, percent_change};
use usf_covid_case_models::{CaseTable, Location};
use usf_covid_presentation::PresentationError;
use usf_covid_presentation::format::{
    format_average_comparison, format_case_count, format_daily_cases_string,
    format_trend_sentence,
};
use usf_covid_source::bulletin::fetch_case_table;
use usf_covid_source::source_def;

use crate::output::{OutputFormat, write_table};

#[derive(Parser)]
#[command(name = "usf_covid", about = "USF COVID-19 case bulletin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the bulletin page and print the normalized case table
    Fetch {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch the bulletin page and print per-campus totals and trends
    Summary {
        /// Only summarize this campus (`tampa`, `st-pete`, `health`,
        /// `sarasota-manatee`)
        #[arg(long)]
        campus: Option<String>,
        /// Trailing trend window in days
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        window: u32,
    },
    /// Run the dashboard API server
    Serve,
}

async fn fetch_table() -> Result<CaseTable, Box<dyn std::error::Error>> {
    let def = source_def::usf_source()?;
    let report = fetch_case_table(&def).await?;

    for line in &report.unclassified {
        log::warn!("Unclassified: {}", line.line);
    }
    for heading in &report.skipped_headings {
        log::warn!("Skipped heading: {heading}");
    }

    Ok(report.table)
}

fn print_summary(table: &CaseTable, location: Location, window: u32) {
    let campus = table.filter(|r| r.location == location);
    println!("{location}");
    println!("{}", "-".repeat(50));

    if campus.is_empty() {
        println!("  No cases reported");
        println!();
        return;
    }

    println!("  Total:        {}", format_case_count(total_cases(&campus)));
    match format_daily_cases_string(&daily_aggregate(&campus)) {
        Ok(latest) => println!("  Latest:       {latest}"),
        Err(e) => log::warn!("{location}: {e}"),
    }

    match percent_change(&campus, window, Local::now().date_naive()) {
        Ok(trend) => println!("  {}", format_trend_sentence(&trend, location)),
        Err(e) => println!("  Trend unavailable: {e}"),
    }

    let comparison = daily_average_by_occupation(&campus)
        .map_err(PresentationError::from)
        .and_then(|avg| format_average_comparison(avg.employee, avg.student, location.campus_label()));
    match comparison {
        Ok(sentence) => println!("  {sentence}"),
        Err(e) => println!("  Average comparison unavailable: {e}"),
    }

    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { format, output } => {
            let table = fetch_table().await?;
            log::info!("Fetched {} case rows", table.len());

            match output {
                Some(path) => {
                    write_table(&table, format, BufWriter::new(File::create(&path)?))?;
                    log::info!("Wrote {}", path.display());
                }
                None => write_table(&table, format, std::io::stdout().lock())?,
            }
        }
        Commands::Summary { campus, window } => {
            let locations = match campus {
                Some(slug) => {
                    vec![Location::from_slug(&slug).ok_or_else(|| format!("Unknown campus: {slug}"))?]
                }
                None => Location::ALL.to_vec(),
            };

            let table = fetch_table().await?;
            for location in locations {
                print_summary(&table, location, window);
            }
        }
        Commands::Serve => {
            // actix-web runs its own single-threaded system; keep it off
            // the tokio worker threads.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(usf_covid_server::run_server())
            })
            .await??;
        }
    }

    Ok(())
}
