mod types;
mod patterns;
mod exchange;
mod engine;
mod config;
mod report;
mod error;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{load_config, AnalyzerConfig};
use engine::PatternMonitor;
use error::MonitorError;
use exchange::BinanceClient;
use report::{print_patterns, OutputFormat, PatternReport};
use types::{TimeFrame, TradingPair};

#[derive(Parser)]
#[command(name = "candle-forecaster")]
#[command(author = "Trading Bot")]
#[command(version = "0.1.0")]
#[command(about = "Candlestick pattern detection and next-candle forecasting for Binance pairs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "forecaster.toml")]
    config: String,

    /// Trading pair, overrides the configured one (e.g. BTCUSDT)
    #[arg(short, long)]
    pair: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both timeframes once and forecast the next coarse candle
    Analyze {
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-run the analysis on a fixed interval until Ctrl+C
    Watch {
        /// Refresh interval in seconds (5-60)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Print each analysis as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// List detected and repeated patterns on a single timeframe
    Patterns {
        /// Timeframe to scan (M1, M5, M15, H1, H4, D1); defaults to the coarse timeframe
        #[arg(short, long)]
        timeframe: Option<String>,
        /// Print the patterns as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for reports
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Candle Pattern Forecaster v0.1.0");

    let mut config = load_config(&cli.config)?;
    if let Some(p) = cli.pair {
        config.pair = TradingPair::from_str(&p).ok_or_else(|| {
            anyhow!("Invalid pair: {}. Use BTCUSDT, ETHUSDT, SOLUSDT, BNBUSDT, ADAUSDT or XRPUSDT", p)
        })?;
    }

    match cli.command {
        Commands::Analyze { json } => {
            run_analysis(config, OutputFormat::from_json_flag(json)).await?;
        }
        Commands::Watch { interval, json } => {
            if let Some(secs) = interval {
                config.refresh_interval_secs = secs;
                config
                    .validate()
                    .map_err(|errors| anyhow!("{}", errors.join(", ")))?;
            }
            run_watch(config, OutputFormat::from_json_flag(json)).await?;
        }
        Commands::Patterns { timeframe, json } => {
            let timeframe = match timeframe {
                Some(tf) => TimeFrame::from_str(&tf)
                    .ok_or_else(|| anyhow!("Invalid timeframe: {}. Use M1, M5, M15, H1, H4 or D1", tf))?,
                None => config.coarse_timeframe,
            };
            show_patterns(&config, timeframe, OutputFormat::from_json_flag(json)).await?;
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_analysis(config: AnalyzerConfig, format: OutputFormat) -> Result<()> {
    info!(
        "Analyzing {} ({} and {}, {} candles)",
        config.pair, config.fine_timeframe, config.coarse_timeframe, config.candle_limit
    );

    let client = BinanceClient::new(config.api_base_url.clone())?;
    info!("Market data from {}", client.base_url());
    let mut monitor = PatternMonitor::new(client, config);

    if let Err(e) = monitor.refresh().await {
        if let MonitorError::Fetch(ref fetch_error) = e {
            if fetch_error.is_transient() {
                error!("Could not collect market data. Check your internet connection.");
            }
        }
        return Err(e.into());
    }

    if let Some(analysis) = monitor.last_analysis() {
        report::print_forecast(&monitor.forecast_report(analysis), format)?;
    }

    Ok(())
}

async fn run_watch(config: AnalyzerConfig, format: OutputFormat) -> Result<()> {
    let interval = Duration::from_secs(config.refresh_interval_secs);
    let client = BinanceClient::new(config.api_base_url.clone())?;
    let mut monitor = PatternMonitor::new(client, config);

    monitor.run(interval, format).await
}

async fn show_patterns(config: &AnalyzerConfig, timeframe: TimeFrame, format: OutputFormat) -> Result<()> {
    let client = BinanceClient::new(config.api_base_url.clone())?;
    let candles = client
        .get_candles(config.pair, timeframe, config.candle_limit)
        .await?;

    let matches = patterns::detect(&candles)?;
    let repeated = patterns::group(&matches);
    info!(
        "{} {} candles: {} patterns, {} repeated",
        candles.len(),
        timeframe,
        matches.len(),
        repeated.len()
    );

    let report = PatternReport {
        pair: config.pair,
        timeframe,
        generated_at: chrono::Utc::now(),
        matches: &matches,
        repeated: &repeated,
    };
    print_patterns(&report, format)
}
