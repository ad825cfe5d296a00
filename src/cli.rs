use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "farmcast",
    version,
    about = "Daily agricultural weather indicators from 3-hour forecasts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Read weather from a JSON file instead of OpenWeatherMap
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Ignore cached responses and fetch fresh data
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Daily forecast summary
    Forecast,
    /// Current conditions with estimated UV index
    Current,
    /// Current conditions and daily forecast with soil moisture estimates
    Agri,
    /// Run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}
