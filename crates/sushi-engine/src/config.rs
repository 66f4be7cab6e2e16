//! # Engine Configuration
//!
//! Where the store lives and the two business knobs (distinct-dish cap,
//! surcharge rate).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     SUSHI_DB_PATH=/var/lib/sushi/sushi.db                               │
//! │     SUSHI_ITEM_CAP=5                                                    │
//! │     SUSHI_SURCHARGE_BPS=1700                                            │
//! │     SUSHI_MAX_CONNECTIONS=5                                             │
//! │     SUSHI_LOG=info,sushi=debug                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/sushi-pos/sushi.toml (Linux)                              │
//! │     ~/Library/Application Support/com.sushi.pos/sushi.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     cap 5, surcharge 17%, sushi.db in the platform data dir             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sushi.toml
//! database_path = "/var/lib/sushi/sushi.db"
//! max_connections = 5
//! distinct_item_cap = 5
//! surcharge_bps = 1700          # 17.00%
//! log_filter = "info,sushi=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use sushi_core::{SurchargeRate, DEFAULT_DISTINCT_ITEM_CAP, DEFAULT_SURCHARGE_BPS};
use sushi_db::DbConfig;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`EngineConfig`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Engine Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite database file. `:memory:` for an isolated store.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// Maximum number of different dishes in one cart.
    pub distinct_item_cap: usize,

    /// Settlement surcharge in basis points.
    pub surcharge_bps: u32,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "sushi", "pos")
        .map(|dirs| dirs.data_dir().join("sushi.db"))
        .unwrap_or_else(|| PathBuf::from("sushi.db"))
}

pub const DEFAULT_LOG_FILTER: &str = "info,sushi=debug,sqlx=warn";

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            database_path: default_database_path(),
            max_connections: 5,
            distinct_item_cap: DEFAULT_DISTINCT_ITEM_CAP,
            surcharge_bps: DEFAULT_SURCHARGE_BPS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sushi.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading engine config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Isolated in-memory store with default business rules.
    pub fn in_memory() -> Self {
        EngineConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.distinct_item_cap == 0 {
            return Err(ConfigError::Invalid(
                "distinct_item_cap must be greater than 0".into(),
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.surcharge_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "surcharge_bps must be at most 10000, got {}",
                self.surcharge_bps
            )));
        }

        Ok(())
    }

    /// The surcharge as a typed rate.
    pub fn surcharge_rate(&self) -> SurchargeRate {
        SurchargeRate::from_bps(self.surcharge_bps)
    }

    /// Database settings derived from this config.
    pub fn to_db_config(&self) -> DbConfig {
        if self.is_in_memory() {
            return DbConfig::in_memory();
        }
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(":memory:")
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SUSHI_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(value) = lookup("SUSHI_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(n) => self.max_connections = n,
                Err(_) => warn!(value = %value, "Ignoring invalid SUSHI_MAX_CONNECTIONS"),
            }
        }

        if let Some(value) = lookup("SUSHI_ITEM_CAP") {
            match value.parse::<usize>() {
                Ok(cap) => {
                    debug!(cap, "Overriding distinct item cap from environment");
                    self.distinct_item_cap = cap;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid SUSHI_ITEM_CAP"),
            }
        }

        if let Some(value) = lookup("SUSHI_SURCHARGE_BPS") {
            match value.parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding surcharge from environment");
                    self.surcharge_bps = bps;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid SUSHI_SURCHARGE_BPS"),
            }
        }

        if let Some(filter) = lookup("SUSHI_LOG") {
            self.log_filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sushi", "pos")
            .map(|dirs| dirs.config_dir().join("sushi.toml"))
    }
}
