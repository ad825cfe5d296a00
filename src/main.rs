mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use datasources::WeatherFile;
use db::Database;
use error::FarmCastError;
use logic::{DataSyncService, WeatherEngine};
use tracing_subscriber::EnvFilter;

/// Cache rows older than this are deleted on startup
const CACHE_RETENTION_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init = cli.command {
        Config::setup_interactive().context("interactive setup failed")?;
        return Ok(());
    }

    let config = load_config(&cli)?;
    let db = open_cache(&cli, &config);

    let mut data_sync = DataSyncService::new(config, db.clone());
    if let Some(ref path) = cli.input {
        let input = WeatherFile::load(path)
            .with_context(|| format!("failed to load weather input {}", path.display()))?;
        data_sync = data_sync.with_input(input);
    }
    if cli.no_cache {
        data_sync = data_sync.bypass_cache();
    }

    match cli.command {
        Commands::Forecast => {
            let forecast = data_sync.load_forecast().await?;
            let days = data_sync
                .engine_for(&forecast)
                .daily_forecast(&forecast.samples);
            if days.is_empty() {
                return Err(FarmCastError::EmptyInput.into());
            }

            if cli.json {
                println!("{}", output::to_json(&days)?);
            } else {
                print!("{}", output::render_daily(&days));
            }
        }
        Commands::Current => {
            let current = data_sync.load_current().await?.ok_or_else(|| {
                FarmCastError::InvalidData("input has no current conditions".into())
            })?;
            let snapshot = WeatherEngine::new().current(&current)?;

            if cli.json {
                println!("{}", output::to_json(&snapshot)?);
            } else {
                print!("{}", output::render_current(&snapshot));
            }
        }
        Commands::Agri => {
            let forecast = data_sync.load_forecast().await?;
            let current = data_sync.load_current().await?;
            let report = data_sync
                .engine_for(&forecast)
                .agricultural_report(&forecast.samples, current.as_ref())?;
            if report.daily.is_empty() && report.current.is_none() {
                return Err(FarmCastError::EmptyInput.into());
            }

            if cli.json {
                println!("{}", output::to_json(&report)?);
            } else {
                print!("{}", output::render_agricultural(&report));
            }
        }
        Commands::Check => {
            let status = data_sync.check_connections().await;
            println!(
                "OpenWeatherMap: {}",
                if status.openweathermap { "OK" } else { "OFFLINE" }
            );
            match db {
                Some(ref db) if status.cache => println!("Cache: {}", db.path().display()),
                _ => println!("Cache: disabled"),
            }
        }
        Commands::Init => unreachable!("handled before loading config"),
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if !Config::exists(cli.config.as_ref()) {
        if cli.input.is_some() {
            tracing::info!("No config file found, using defaults for --input");
            return Ok(Config::default());
        }
        if let Commands::Check = cli.command {
            eprintln!("No configuration found. Run `farmcast init` to create one.");
        }
    }

    Config::load(cli.config.clone()).context("failed to load configuration")
}

fn open_cache(cli: &Cli, config: &Config) -> Option<Database> {
    if !config.cache.enabled || cli.input.is_some() {
        return None;
    }

    match Database::open(cli.data_dir.as_ref()) {
        Ok(db) => {
            match db.purge_cache_older_than(chrono::Duration::days(CACHE_RETENTION_DAYS)) {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Purged {} stale cache rows", n),
                Err(e) => tracing::warn!("Failed to purge weather cache: {}", e),
            }
            Some(db)
        }
        Err(e) => {
            tracing::warn!("Weather cache unavailable: {}", e);
            None
        }
    }
}
