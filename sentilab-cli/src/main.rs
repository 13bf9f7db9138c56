//! SentiLab CLI — run the sentiment-vs-performance pipeline.
//!
//! Fetches (or synthesizes) daily prices for a stock and its benchmark
//! index, scores news sentiment, builds the joined feature table, runs the
//! analysis passes, and saves the artifact bundle.
//!
//! Credentials come from the environment (a `.env` file is honored):
//! - `NEWS_API_KEY` — NewsAPI key; absent selects synthetic headlines
//! - `SENTIMENT_API_KEY` — remote scorer key; absent selects the lexicon

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sentilab_runner::runner::{run_pipeline, Credentials};
use sentilab_runner::{save_artifacts, PipelineResult, RunConfig};

#[derive(Parser)]
#[command(
    name = "sentilab",
    about = "SentiLab — stock performance vs news sentiment analysis pipeline"
)]
struct Cli {
    /// Stock symbol to analyze.
    #[arg(long, default_value = "THYAO.IS")]
    symbol: String,

    /// Benchmark index symbol.
    #[arg(long, default_value = "XU100.IS")]
    index: String,

    /// Analysis start date (YYYY-MM-DD), inclusive.
    #[arg(long, default_value = "2022-01-01")]
    start: String,

    /// Analysis end date (YYYY-MM-DD), inclusive.
    #[arg(long, default_value = "2023-01-01")]
    end: String,

    /// Master seed for synthetic data and stochastic analysis.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Trailing window (trading days) for sentiment volatility.
    #[arg(long, default_value_t = 5)]
    sentiment_window: usize,

    /// Output directory for the artifact bundle.
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Offline mode: synthetic data only, no network access.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn main() -> Result<()> {
    // A missing .env file is fine; a malformed one is not.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("failed to load .env"),
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = RunConfig {
        stock_symbol: cli.symbol,
        index_symbol: cli.index,
        start_date: parse_date(&cli.start, "--start")?,
        end_date: parse_date(&cli.end, "--end")?,
        master_seed: cli.seed,
        sentiment_window: cli.sentiment_window,
        offline: cli.offline,
    };
    config.validate()?;

    let credentials = Credentials {
        news_api_key: std::env::var("NEWS_API_KEY").ok().filter(|k| !k.is_empty()),
        sentiment_api_key: std::env::var("SENTIMENT_API_KEY").ok().filter(|k| !k.is_empty()),
    };

    let result = run_pipeline(&config, &credentials)?;

    print_summary(&result);

    let run_dir = save_artifacts(&result, &cli.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("{flag}: expected YYYY-MM-DD, got '{s}'"))
}

fn print_summary(result: &PipelineResult) {
    let config = &result.config;

    println!();
    println!(
        "{} vs {} — {} to {} ({} trading days)",
        config.stock_symbol,
        config.index_symbol,
        config.start_date,
        config.end_date,
        result.rows.len()
    );
    println!("Run ID: {}", result.run_id);

    if result.source_modes.any_synthetic() {
        println!();
        println!("*** SYNTHETIC DATA in use — results do not describe the real market ***");
        println!(
            "    prices: {}/{}  news: {}  scorer: {}",
            result.source_modes.stock_prices,
            result.source_modes.index_prices,
            result.source_modes.news,
            result.source_modes.scorer
        );
    }

    println!();
    match &result.correlations.sentiment_vs_relative_perf {
        Some(c) => println!(
            "Sentiment vs relative performance: r = {:.4}, p = {:.4}, n = {}",
            c.r, c.p_value, c.n
        ),
        None => println!("Sentiment vs relative performance: not computable"),
    }
    println!(
        "Association rules: {} (avg lift {:.3})",
        result.patterns.rules.len(),
        result.patterns.avg_lift()
    );
    if let Some(c) = &result.classification {
        println!(
            "Classification accuracy: {:.3} (baseline {:.3})",
            c.accuracy, c.baseline_accuracy
        );
    }
    if let Some(c) = &result.clusters {
        println!("Day regimes: k = {} (silhouette {:.3})", c.k, c.silhouette);
    }
    if !result.warnings.is_empty() {
        println!("Data quality warnings: {}", result.warnings.len());
    }
    println!();
}
