mod batch;
mod output;
mod reference;
mod score;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use finnbil_core::{AppConfig, CurveSelection, ListingAttributes};
use finnbil_valuation::{CachedReferenceTable, ValueScorer};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "finnbil-cli")]
#[command(about = "Score used-car listings against a depreciation curve")]
struct Cli {
    /// Reference price sheet (CSV); overrides `FINNBIL_REFERENCE_CSV`.
    #[arg(long, global = true)]
    reference_csv: Option<PathBuf>,

    /// Year ages are measured against; overrides `FINNBIL_EVALUATION_YEAR`.
    #[arg(long, global = true, value_parser = clap::value_parser!(i32).range(1000..=9999))]
    as_of_year: Option<i32>,

    /// Depreciation curve, `new` or `used`; overrides `FINNBIL_DEPRECIATION_CURVE`.
    #[arg(long, global = true)]
    curve: Option<CurveSelection>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a single listing.
    Score {
        /// Seller's model/trim text, e.g. "RAV4 Hybrid AWD-i Executive aut".
        #[arg(long)]
        variant: String,
        /// Model year (first registration).
        #[arg(long)]
        year: i32,
        /// Odometer reading in km.
        #[arg(long, allow_negative_numbers = true)]
        km: i64,
        /// Asking price in whole NOK.
        #[arg(long, allow_negative_numbers = true)]
        price: i64,
        /// Also project the asking price this many years ahead.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
        forecast: Option<u32>,
        /// Print the valuation as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Score a JSON array of scraped listings and print a ranked report.
    Batch {
        /// File holding the scraper's JSON output.
        #[arg(long)]
        listings: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the loaded reference price sheet.
    Reference {
        /// Only show rows from this price-list year.
        #[arg(long)]
        year: Option<i32>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config =
        finnbil_core::load_app_config_from_env().context("failed to load configuration")?;
    apply_overrides(&mut config, &cli);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        env = %config.env,
        reference_csv = %config.reference_csv_path.display(),
        curve = %config.depreciation_curve,
        evaluation_year = config.evaluation_year,
        "configuration loaded"
    );

    let scorer = ValueScorer::from_config(&config);
    let table = CachedReferenceTable::new(&config.reference_csv_path);

    match cli.command {
        Commands::Score {
            variant,
            year,
            km,
            price,
            forecast,
            json,
        } => {
            let listing = ListingAttributes {
                variant,
                model_year: year,
                odometer_km: km,
                asking_price: price,
            };
            score::run_score(&scorer, &table, listing, forecast, json)
        }
        Commands::Batch { listings, json } => batch::run_batch(&scorer, &table, &listings, json),
        Commands::Reference { year } => {
            reference::run_reference(&table, year);
            Ok(())
        }
    }
}

/// Command-line options win over environment configuration.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(path) = &cli.reference_csv {
        config.reference_csv_path.clone_from(path);
    }
    if let Some(year) = cli.as_of_year {
        config.evaluation_year = year;
    }
    if let Some(curve) = cli.curve {
        config.depreciation_curve = curve;
    }
}
