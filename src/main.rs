//! powerwatch — battery power draw sampler for Linux laptops.
//!
//! Run with:  `RUST_LOG=info powerwatch watch`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use power_config::PowerConfig;
use power_sensor::SensorSources;
use power_watcher::Watcher;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "powerwatch", version, about = "Sample and average battery power draw")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/powerwatch/powerwatch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a single reading and exit.
    Now,
    /// Sample continuously and print the trailing mean until Ctrl-C.
    Watch {
        /// Trailing window to average, in seconds.
        #[arg(short, long)]
        window: Option<u64>,
        /// Seconds between reports.
        #[arg(short, long)]
        every: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(power_config::default_path);
    let config = power_config::load(&config_path)
        .with_context(|| format!("loading '{}'", config_path.display()))?;
    let sources = SensorSources::from_config(&config.sensor)?;

    match cli.command {
        Command::Now => now(&sources),
        Command::Watch { window, every } => watch(config, sources, window, every).await,
    }
}

fn now(sources: &SensorSources) -> Result<()> {
    let sample = sources.sample_now()?;
    println!("Current: {}", sample.current);
    println!("Voltage: {}", sample.voltage);
    println!("Power: {}", sample.power);
    Ok(())
}

async fn watch(
    config: PowerConfig,
    sources: SensorSources,
    window: Option<u64>,
    every: Option<u64>,
) -> Result<()> {
    let window = Duration::from_secs(window.unwrap_or(config.report.window_secs));
    let every = Duration::from_secs(every.unwrap_or(config.report.interval_secs).max(1));

    tracing::info!("powerwatch v{} starting", env!("CARGO_PKG_VERSION"));
    let mut watcher = Watcher::from_config(&config.watcher, sources)?;

    let mut ticker = tokio::time::interval(every);
    // the first tick fires immediately, before any sample exists
    ticker.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => println!("{}\n", watcher.mean(window)),
        }
    }

    watcher.stop().await;
    Ok(())
}
