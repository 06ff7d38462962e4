//! ipotrack command line
//!
//! Classifies company descriptions, predicts listing gains, and syncs the
//! Chittorgarh upcoming and historical IPO reports.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use ipotrack::application::ingest_service::IngestService;
use ipotrack::application::listing_service::IpoListingService;
use ipotrack::application::ml::GainPredictor;
use ipotrack::application::ml::evaluation::evaluate;
use ipotrack::application::ml::smartcore_predictor::load_trained_model;
use ipotrack::application::sector_classifier::SectorClassifier;
use ipotrack::config::Config;
use ipotrack::infrastructure::observability::Metrics;
use ipotrack::infrastructure::{
    ChittorgarhReportClient, InMemoryHistoricalIpoRepository, InMemoryIpoRepository,
};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "IPO sector classification and listing-gain prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a company description into a sector
    Classify {
        /// Company description
        #[arg(short, long)]
        text: String,

        /// Also print per-sector keyword hits
        #[arg(long)]
        scores: bool,
    },
    /// Predict the listing gain for a JSON feature payload
    Predict {
        /// JSON object, e.g. '{"qib_subscription": 10, "gmp": 50}'
        #[arg(short, long)]
        payload: String,
    },
    /// Predict listing gains for every row of a CSV file
    PredictCsv {
        /// CSV with a header row of feature names
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Fetch the upcoming IPO report and list issues with days to open
    SyncUpcoming {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Fetch historical IPO reports and promote listings to closed records
    SyncHistorical {
        /// First year (defaults to HISTORY_YEARS start)
        #[arg(long)]
        from: Option<i32>,

        /// Last year (defaults to HISTORY_YEARS end)
        #[arg(long)]
        to: Option<i32>,
    },
    /// Score the predictor against historical listing gains
    Evaluate {
        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,
    },
}

/// Shared wiring for commands that touch the repositories.
struct App {
    listings: IpoListingService,
    ingest: IngestService,
}

impl App {
    fn build(
        config: &Config,
        classifier: SectorClassifier,
        predictor: GainPredictor,
        metrics: Metrics,
    ) -> Result<Self> {
        let ipos = Arc::new(InMemoryIpoRepository::new());
        let historical = Arc::new(InMemoryHistoricalIpoRepository::new());
        let source = Arc::new(ChittorgarhReportClient::new(
            &config.report_base_url,
            config.report_api_version.as_str(),
            config.http_timeout,
            config.http_max_retries,
        )?);

        Ok(Self {
            listings: IpoListingService::new(
                ipos.clone(),
                historical.clone(),
                classifier,
                predictor,
                metrics.clone(),
            ),
            ingest: IngestService::new(source, ipos, historical, metrics),
        })
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_payload(payload: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(payload).context("Payload is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("Payload must be a JSON object, got {}", other),
    }
}

/// Predict every CSV row and write the rows back out with two extra columns.
fn predict_csv(listings: &IpoListingService, input: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let headers = reader.headers()?.clone();

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    let mut out_headers = headers.clone();
    out_headers.push_field("predicted_gain");
    out_headers.push_field("confidence");
    writer.write_record(&out_headers)?;

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", line + 1))?;
        // Blank cells are missing values, not malformed ones
        let payload: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.trim().is_empty())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();

        let result = listings.predict_payload(&payload);
        let mut row = record.clone();
        row.push_field(&result.predicted_gain.to_string());
        row.push_field(&result.confidence.to_string());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays machine-readable
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let metrics = Metrics::new()?;

    let classifier = SectorClassifier::new(Arc::new(config.load_taxonomy()?));
    let predictor = GainPredictor::new(load_trained_model(&config.model_path));
    if let Some(name) = predictor.model_name() {
        info!("Predictions use {}", name);
    }

    let app = App::build(&config, classifier, predictor, metrics.clone())?;
    let history = |from: Option<i32>, to: Option<i32>| {
        (
            from.unwrap_or(config.history_from),
            to.unwrap_or(config.history_to),
        )
    };

    match cli.command {
        Commands::Classify { text, scores } => {
            let sector = app.listings.classify(Some(&text));
            if scores {
                print_json(&json!({
                    "sector": sector,
                    "scores": app.listings.classifier().scores(&text),
                }))?;
            } else {
                print_json(&json!({ "sector": sector }))?;
            }
        }
        Commands::Predict { payload } => {
            let payload = parse_payload(&payload)?;
            print_json(&app.listings.predict_payload(&payload))?;
        }
        Commands::PredictCsv { input } => {
            predict_csv(&app.listings, &input)?;
        }
        Commands::SyncUpcoming { today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let summary = app.ingest.sync_upcoming(today).await?;
            let tracked = app.listings.refresh_gauges().await?;
            print_json(&json!({
                "summary": summary,
                "tracked": tracked,
                "upcoming": app.listings.upcoming(today).await?,
            }))?;
        }
        Commands::SyncHistorical { from, to } => {
            let (from, to) = history(from, to);
            let summary = app.ingest.sync_historical(from, to).await?;
            let promoted = app.listings.promote_closed(Some((from, to))).await?;
            print_json(&json!({
                "summary": summary,
                "promoted": promoted,
                "listing_years": app.listings.listing_years().await?,
            }))?;
        }
        Commands::Evaluate { from, to } => {
            let (from, to) = history(from, to);
            app.ingest.sync_historical(from, to).await?;
            let listings = app.listings.past_ipos().await?;
            match evaluate(app.listings.predictor(), &listings) {
                Some(evaluation) => print_json(&evaluation)?,
                None => warn!("No historical listings to evaluate for {}-{}", from, to),
            }
        }
    }

    if config.observability_enabled {
        info!("Metrics:\n{}", metrics.render());
    }

    Ok(())
}
