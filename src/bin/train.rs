//! Offline training CLI: loads an OHLCV series from CSV, fits the predictor
//! ensemble, persists the bundle, and prints the resulting signal.
//!
//! # Usage
//! ```sh
//! cargo run --bin train -- --input data/sol.csv --output data/models.json
//! ```

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use solsignal::application::analyst::generate_signal;
use solsignal::application::ml::{ModelStore, train};
use solsignal::application::patterns::identify_patterns;
use solsignal::config::SignalConfig;
use solsignal::domain::performance::risk::risk_metrics;
use solsignal::domain::ports::SeriesProvider;
use solsignal::infrastructure::market_data::CsvSeriesProvider;
use solsignal::infrastructure::persistence::JsonModelStore;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an OHLCV CSV file, or a directory of <symbol>.csv files
    #[arg(long, default_value = "data/series")]
    input: PathBuf,

    /// Path to the output model bundle
    #[arg(long, default_value = "data/models.json")]
    output: PathBuf,

    /// Optional TOML config overriding pipeline defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token symbol to train on
    #[arg(long, default_value = "SOL")]
    symbol: String,

    /// Maximum number of most-recent bars to use
    #[arg(long, default_value_t = 720)]
    bars: usize,
}

fn main() -> Result<()> {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SignalConfig::from_toml_file(path)?,
        None => SignalConfig::default(),
    };

    let provider = CsvSeriesProvider::new(&args.input);
    let series = provider
        .fetch(&args.symbol, args.bars)
        .context("fetching historical series")?;
    info!(symbol = %args.symbol, bars = series.len(), "series loaded");

    let models = train(&series, &config).context("training ensemble")?;

    let store = JsonModelStore::new(&args.output);
    store
        .save(&models)
        .context("persisting model bundle")?;

    let signal = generate_signal(&series, &models, &config)?;
    if let Some(time) = DateTime::from_timestamp(signal.timestamp, 0) {
        info!(
            time = %time.to_rfc3339(),
            recommendation = ?signal.recommendation,
            confidence = signal.confidence,
            "signal ready"
        );
    }
    println!("{}", serde_json::to_string_pretty(&signal)?);

    let closes: Vec<f64> = series.iter().map(|c| c.close_f64()).collect();
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    if let Some(metrics) = risk_metrics(&returns, 365.0 * 24.0) {
        info!(
            volatility = metrics.volatility,
            sharpe = metrics.sharpe_ratio,
            max_drawdown = metrics.max_drawdown,
            var_95 = metrics.var_95,
            "series risk profile"
        );
    }

    let frame = solsignal::application::indicators::compute_indicators(&series, &config.indicators)?;
    if let Some(patterns) = identify_patterns(&frame) {
        info!(
            support = patterns.support_resistance.support,
            resistance = patterns.support_resistance.resistance,
            position = patterns.support_resistance.position,
            trend = ?patterns.trend,
            "price patterns"
        );
    }

    Ok(())
}
