//! dao-results configuration file handling
//!
//! Provides default configuration generation and loading for the CLI.
//! Configuration files are TOML format and live under the user's config
//! directory unless a path is given explicitly.
//!
//! Command-line flags override anything set here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default time series bucket width
const DEFAULT_BUCKET: &str = "1h";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file '{0}' already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Invalid bucket width '{value}': {reason}")]
    InvalidBucket { value: String, reason: String },
}

/// Output encoding for processed results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Cbor,
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Aggregation settings
    #[serde(default)]
    pub results: TallyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Time series bucket width (humantime, e.g. "1h", "30m", "1day")
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            format: OutputFormat::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl TallyConfig {
    /// Parsed bucket width
    pub fn bucket_duration(&self) -> Result<Duration, ConfigError> {
        parse_bucket(&self.bucket)
    }
}

impl ResultsConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ResultsConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // Reject a bad bucket at load time rather than mid-run
        config.results.bucket_duration()?;

        Ok(config)
    }

    /// Load the explicit path, else the default path if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        write_file(path, &contents)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# dao-results configuration
#
# Flags passed on the command line take precedence over these values.

[results]
# Width of one time series bucket (e.g. "30m", "1h", "1day")
bucket = "{bucket}"

# Output format: "text", "json" or "cbor"
format = "text"

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set
level = "{level}"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/dao-results.log"
"#,
            bucket = DEFAULT_BUCKET,
            level = DEFAULT_LOG_LEVEL,
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path, force: bool) -> Result<(), ConfigError> {
        if config_path.exists() && !force {
            return Err(ConfigError::AlreadyExists(config_path.to_path_buf()));
        }
        write_file(config_path, &Self::generate_default_toml())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a humantime bucket width; zero is rejected.
pub fn parse_bucket(value: &str) -> Result<Duration, ConfigError> {
    let duration = humantime::parse_duration(value).map_err(|e| ConfigError::InvalidBucket {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if duration.as_secs() == 0 {
        return Err(ConfigError::InvalidBucket {
            value: value.to_string(),
            reason: "must be at least one second".to_string(),
        });
    }

    Ok(duration)
}

/// Get the default config file path
///
/// ~/.config/dao-results/config.toml on Linux
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dao-results")
        .join("config.toml")
}
