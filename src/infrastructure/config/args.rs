use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "wanderpin",
    version,
    about = "Discover and cache photos around a travel pin",
    long_about = None
)]
pub struct CliArgs {
    /// Pin latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Pin longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Discard the pin's current collection and fetch a new one.
    #[arg(long)]
    pub refresh: bool,

    /// Search API key.
    #[arg(long, env = "FLICKR_API_KEY")]
    pub api_key: Option<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the journal and image blobs.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Maximum concurrent photo downloads.
    #[arg(long)]
    pub max_concurrent_downloads: Option<usize>,
}
