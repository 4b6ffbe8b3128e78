//! Configuration system for Scout
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/scout/config.{SCOUT_ENV}.json
//! 3. Default values
//!
//! Where SCOUT_ENV can be: production (default), development, test
//!
//! # Examples
//!
//! ```no_run
//! use scout::config::ScoutConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScoutConfig::load(None)?;
//! println!("Catalog: {:?}, ceiling {}", config.catalog_path, config.search.price_ratio_ceiling);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - SCOUT_CATALOG_PATH
//! - SCOUT_MODEL_PATH
//! - SCOUT_PRICE_RATIO
//! - SCOUT_MAX_RESULTS

use crate::archetype::ArchetypeTable;
use crate::catalog::CatalogColumns;
use crate::engine::AlternativesQuery;
use crate::features::InputRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// CSV export of the clustered dataset
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Fitted model: `.json` export or bincode snapshot
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Column names of the non-feature catalog fields
    #[serde(default)]
    pub columns: CatalogColumns,

    /// Defaults for alternatives searches
    #[serde(default)]
    pub search: AlternativesQuery,

    /// Accepted raw attribute range for classification input
    #[serde(default)]
    pub input_range: InputRange,

    /// Cluster label → archetype name
    #[serde(default)]
    pub archetypes: ArchetypeTable,

    /// Write logs to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("fifa_cleaned.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("kmeans_model.json")
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            model_path: default_model_path(),
            columns: CatalogColumns::default(),
            search: AlternativesQuery::default(),
            input_range: InputRange::default(),
            archetypes: ArchetypeTable::default(),
            log_file: None,
            debug: false,
        }
    }
}

impl ScoutConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: ScoutConfig = serde_json::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/scout/config.{SCOUT_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("SCOUT_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));

            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::info!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var("SCOUT_CATALOG_PATH") {
            self.catalog_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("SCOUT_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }

        if let Ok(ratio) = std::env::var("SCOUT_PRICE_RATIO") {
            self.search.price_ratio_ceiling = ratio.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("SCOUT_PRICE_RATIO is not a number: {}", ratio))
            })?;
        }

        if let Ok(max) = std::env::var("SCOUT_MAX_RESULTS") {
            self.search.max_results = max.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("SCOUT_MAX_RESULTS is not a count: {}", max))
            })?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog_path cannot be empty".to_string(),
            ));
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "model_path cannot be empty".to_string(),
            ));
        }

        self.search
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if !(self.input_range.min.is_finite()
            && self.input_range.max.is_finite()
            && self.input_range.min <= self.input_range.max)
        {
            return Err(ConfigError::ValidationError(format!(
                "input_range must satisfy min <= max, got {}..={}",
                self.input_range.min, self.input_range.max
            )));
        }

        if self.archetypes.is_empty() {
            return Err(ConfigError::ValidationError(
                "archetypes table cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("scout"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
