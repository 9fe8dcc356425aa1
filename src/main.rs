//! Expected-corners prediction, value-bet scanning and accuracy reporting.

mod config;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::AppConfig;
use corners_ml::{CornerModel, FeatureEngineer};
use corners_models::{AliasTable, FallbackTable, PredictionRow};
use corners_services::{
    read_historical_results, write_csv, AccuracyReporter, DiscordNotifier, FetchOutcome, FixturesClient,
    LogNotifier, OddsApiClient, PredictorService, SofascoreClient, ValueBetEvaluator,
};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "corners-rs", version, about = "Expected corners prediction and value bet finder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Search hyperparameters, fit on the fallback table and save the model
    Train,
    /// Predict expected corners for a day's fixtures
    Predict {
        /// Fixture date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Compare predictions against bookmaker totals and alert on value
    ValueBets,
    /// Replay historical results and report prediction accuracy
    Evaluate,
    /// Scrape per-match statistics for the last N days
    ScrapeStats {
        #[arg(long, default_value = "100")]
        days: u32,
    },
    /// Scrape corner results for the last N days
    ScrapeCorners {
        #[arg(long, default_value = "400")]
        days: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corners_rs=info,corners_services=info,corners_ml=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new().context("loading configuration")?;
    info!("✅ Configuration loaded");

    let outcome = match cli.command {
        Command::Train => train(&config),
        Command::Predict { date } => predict(&config, date.unwrap_or_else(today)).await,
        Command::ValueBets => value_bets(&config).await,
        Command::Evaluate => evaluate(&config),
        Command::ScrapeStats { days } => scrape_stats(&config, days).await,
        Command::ScrapeCorners { days } => scrape_corners(&config, days).await,
    };

    if let Err(e) = &outcome {
        error!("❌ {:#}", e);
    }
    outcome
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn train(config: &AppConfig) -> Result<()> {
    let fallback = FallbackTable::load(&config.paths.fallback_path)?;
    let rows = FeatureEngineer::new().training_rows(&fallback);
    info!("🧠 Training on {} of {} teams", rows.len(), fallback.len());

    let (model, outcome) = CornerModel::train(&rows, &config.search_config())?;
    model.save(&config.paths.model_path)?;

    info!(
        "🏁 Done: {} trials, best cv_rmse={:.5}",
        outcome.trials.len(),
        outcome.best_cv_rmse
    );
    Ok(())
}

/// Model, fallback table and alias table are all required.
fn load_predictor(config: &AppConfig) -> Result<PredictorService<CornerModel>> {
    let model = CornerModel::load(&config.paths.model_path)?;
    let fallback = FallbackTable::load(&config.paths.fallback_path)?;
    let aliases = AliasTable::load(&config.paths.alias_path)?;
    info!("📋 {} teams in fallback table, {} aliases", fallback.len(), aliases.len());

    Ok(PredictorService::new(model, fallback, aliases, config.normalizer.clone()))
}

async fn predict(config: &AppConfig, date: NaiveDate) -> Result<()> {
    let predictor = load_predictor(config)?;
    let client = FixturesClient::new(config.sources.fixtures_api.clone(), &config.paths.cache_dir)?;

    let fixtures = client.fixtures_for_date(date).await;
    let predictions = predictor.predict_fixtures(&fixtures);
    info!("📊 {} of {} fixtures predicted for {}", predictions.len(), fixtures.len(), date);

    for prediction in &predictions {
        info!("⚽ {:<45} {:>6.2}", prediction.label(), prediction.display_total());
    }

    let rows: Vec<PredictionRow> = predictions.iter().map(PredictionRow::from).collect();
    write_csv(&config.paths.output_dir.join(format!("predictions_{}.csv", date)), &rows)
}

async fn value_bets(config: &AppConfig) -> Result<()> {
    let predictor = load_predictor(config)?;
    let odds = OddsApiClient::new(config.sources.odds_api.clone())?;

    let events = match odds.soccer_totals().await {
        FetchOutcome::Data(events) => events,
        FetchOutcome::Empty => {
            warn!("No odds available");
            Vec::new()
        }
        FetchOutcome::Failed(reason) => {
            warn!("⚠️  Odds request failed: {}", reason);
            Vec::new()
        }
    };

    let evaluator = ValueBetEvaluator::new(config.value_bets.clone());
    let bets = match &config.notifications.discord_webhook_url {
        Some(url) => {
            let notifier = DiscordNotifier::new(url.clone(), Duration::from_secs(config.notifications.timeout_secs))?;
            evaluator.scan(&events, &predictor, &notifier).await
        }
        None => evaluator.scan(&events, &predictor, &LogNotifier).await,
    };

    write_csv(&config.paths.output_dir.join("value_bets.csv"), &bets)
}

fn evaluate(config: &AppConfig) -> Result<()> {
    let predictor = load_predictor(config)?;
    let results = read_historical_results(&config.paths.results_path)?;

    let report = AccuracyReporter::new(config.evaluation.clone()).replay(&results, &predictor);
    report.log_summary();

    write_csv(&config.paths.output_dir.join("evaluation_results.csv"), &report.records)?;
    write_csv(&config.paths.output_dir.join("team_accuracy.csv"), &report.teams)
}

async fn scrape_stats(config: &AppConfig, days: u32) -> Result<()> {
    let client = SofascoreClient::new(config.sources.sofascore.clone())?;
    let rows = client.scrape_statistics(today(), days).await;
    if rows.is_empty() {
        warn!("❌ No statistics collected");
        return Ok(());
    }
    write_csv(&config.paths.output_dir.join("match_statistics.csv"), &rows)
}

async fn scrape_corners(config: &AppConfig, days: u32) -> Result<()> {
    let client = SofascoreClient::new(config.sources.sofascore.clone())?;
    let rows = client.scrape_corners(today(), days).await;
    if rows.is_empty() {
        warn!("❌ No corner results collected");
        return Ok(());
    }
    write_csv(&config.paths.results_path, &rows)
}
