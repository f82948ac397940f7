//! Configuration management.
//!
//! Configuration comes from an optional TOML file plus `LENS_QUERY_*`
//! environment overrides (for example `LENS_QUERY_FETCH__REQUEST_DELAY_SECS=5`).

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "LENS_QUERY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL construction settings
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Page fetching settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check the values for consistency
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        self.builder.validate()?;
        self.logging.validate()
    }
}

/// Base paths and paging limits used when building search URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Base path for single-page searches
    #[serde(default = "default_search_base")]
    pub search_base: String,

    /// Base path for paginated searches
    #[serde(default = "default_search_base")]
    pub paged_base: String,

    /// Results per page (`n=`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Most results the service will page through for one query
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            search_base: default_search_base(),
            paged_base: default_search_base(),
            page_size: default_page_size(),
            max_results: default_max_results(),
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        for base in [&self.search_base, &self.paged_base] {
            let parsed = url::Url::parse(base)
                .map_err(|e| ConfigFileError::Invalid(format!("base path '{}': {}", base, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigFileError::Invalid(format!(
                    "base path '{}' must use http or https",
                    base
                )));
            }
            if parsed.query().is_some() {
                return Err(ConfigFileError::Invalid(format!(
                    "base path '{}' must not carry a query string",
                    base
                )));
            }
        }

        if self.page_size == 0 {
            return Err(ConfigFileError::Invalid("page_size must be positive".into()));
        }
        if self.max_results < self.page_size {
            return Err(ConfigFileError::Invalid(
                "max_results must be at least page_size".into(),
            ));
        }
        Ok(())
    }
}

fn default_search_base() -> String {
    "https://www.lens.org/lens/search".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_max_results() -> u32 {
    500
}

/// Settings for dereferencing built URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Pause between consecutive page requests, in seconds
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_delay_secs: default_request_delay(),
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_request_delay() -> u64 {
    20
}

fn default_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        self.level
            .parse::<LevelFilter>()
            .map(|_| ())
            .map_err(|_| ConfigFileError::Invalid(format!("unknown log level '{}'", self.level)))
    }

    /// `EnvFilter` directive for this crate's events.
    ///
    /// `quiet` beats `verbose`, and both beat the configured level.
    pub fn directive(&self, verbose: u8, quiet: bool) -> String {
        let level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => self.level.as_str(),
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        format!("lens_query={}", level)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides applied on top
pub fn load_config(path: &Path) -> Result<Config, ConfigFileError> {
    load_sources(Some(path))
}

/// Get the configuration from `LENS_QUERY_*` environment variables or defaults
pub fn get_config() -> Result<Config, ConfigFileError> {
    load_sources(None)
}

fn load_sources(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Look for a configuration file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("lens-query.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("lens-query").join("config.toml"))
        .filter(|path| path.is_file())
}
