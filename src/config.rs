use serde::Deserialize;
use std::path::PathBuf;

use crate::family::{GroupPolicy, DEFAULT_MAX_ATTEMPTS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Minimum length of a family shared password
    pub min_password_len: usize,
    /// Maximum length of a family name
    pub max_name_len: usize,
    /// Code draws before a create gives up
    pub code_max_attempts: u32,
    /// Lifetime of a session token issued on join
    pub session_expiry_minutes: u64,
    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,
    /// Argon2 iteration count
    pub hash_iterations: u32,
    /// Argon2 lanes
    pub hash_parallelism: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("home-stock")
                .join("home-stock.db"),
            port: 8080,
            min_password_len: 8,
            max_name_len: 100,
            code_max_attempts: DEFAULT_MAX_ATTEMPTS,
            session_expiry_minutes: 24 * 60,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            hash_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path
            .or_else(|| std::env::var("HOME_STOCK_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("HOME_STOCK_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(port) = std::env::var("HOME_STOCK_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HOME_STOCK_PORT", port))?;
        }
        if let Ok(attempts) = std::env::var("HOME_STOCK_CODE_MAX_ATTEMPTS") {
            config.code_max_attempts = attempts
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HOME_STOCK_CODE_MAX_ATTEMPTS", attempts))?;
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/home-stock/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("home-stock")
            .join("config.yaml")
    }

    pub fn group_policy(&self) -> GroupPolicy {
        GroupPolicy {
            min_password_len: self.min_password_len,
            max_name_len: self.max_name_len,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidValue(var, value) => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
