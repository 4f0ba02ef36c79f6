//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::infrastructure::flickr::FlickrConfig;

const APP_NAME: &str = "wanderpin";
const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "wanderpin";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration: defaults, overlaid by the config file,
/// overlaid by CLI arguments.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    pub log_level: LogLevel,

    /// Directory holding the journal and image blobs. Defaults to the
    /// per-user data directory.
    pub cache_dir: Option<PathBuf>,

    /// Maximum concurrent photo downloads per refresh cycle.
    pub max_concurrent_downloads: usize,

    /// Timeout for a single image download, in seconds.
    pub fetch_timeout_secs: u64,

    /// Search endpoint configuration.
    pub search: FlickrConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            cache_dir: None,
            max_concurrent_downloads: 4,
            fetch_timeout_secs: 30,
            search: FlickrConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the config file (if present) and merges
    /// CLI arguments over it.
    #[must_use]
    pub fn load(args: &CliArgs) -> Self {
        let path = args.config.clone().or_else(Self::default_config_path);

        let mut config = path
            .as_ref()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default();

        Self::merge_with_args(&mut config, args);
        config
    }

    fn merge_with_args(config: &mut Self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            config.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            config.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(api_key) = &args.api_key {
            config.search.api_key = api_key.clone();
        }
        if let Some(cache_dir) = &args.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
        if let Some(max_downloads) = args.max_concurrent_downloads {
            config.max_concurrent_downloads = max_downloads;
        }
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("wanderpin.log"))
    }

    /// Returns the effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns the effective cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file_shape() {
        let toml_content = r#"
            log_level = "debug"
            max_concurrent_downloads = 8

            [search]
            api_key = "abc123"
            page_size = 24
            image_size_suffix = "n"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_concurrent_downloads, 8);
        assert_eq!(config.search.api_key, "abc123");
        assert_eq!(config.search.page_size, 24);
        assert_eq!(config.search.image_size_suffix, "n");
        // Untouched fields keep their defaults.
        assert_eq!(config.search.max_page, 13);
        assert_eq!(config.search.radius_km, 7);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.max_concurrent_downloads, 4);
        assert_eq!(config.search.page_size, 18);
        assert!(config.search.api_key.is_empty());
    }
}
