//! Configuration for forecasting runs
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, else the user override (~/.config/goalcast/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Missing keys in an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::model_store::{FileModelStore, ModelStore};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/goalcast.toml");

/// Where the fitted model is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Database,
    File,
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "file" => Ok(Self::File),
            _ => Err(format!("Unknown model store: {} (valid: database, file)", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Number of future months in a batch forecast
    pub horizon_months: usize,
    /// Output document for batch forecasts
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GoalConfig {
    /// Target used by batch projections
    pub default_target: f64,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub store: StoreKind,
    /// Artifact path for the file store
    pub path: PathBuf,
}

impl ModelConfig {
    /// Open the configured model store
    pub fn open_store(&self, db: &Database) -> Arc<dyn ModelStore> {
        match self.store {
            StoreKind::Database => Arc::new(db.clone()),
            StoreKind::File => Arc::new(FileModelStore::new(self.path.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub forecast: ForecastConfig,
    pub goal: GoalConfig,
    pub model: ModelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig {
                horizon_months: 3,
                output_path: PathBuf::from("goal_projection.json"),
            },
            goal: GoalConfig {
                default_target: 50000.0,
            },
            model: ModelConfig {
                store: StoreKind::Database,
                path: PathBuf::from("goal_projection_model.json"),
            },
        }
    }
}

impl Config {
    /// Load configuration (override first, then default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::InvalidData(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!(path = %path.display(), "Using user config");
                    fs::read_to_string(&path).map_err(|e| {
                        Error::InvalidData(format!("Failed to read config: {}", e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(forecast) = raw.forecast {
            if let Some(horizon) = forecast.horizon_months {
                if horizon == 0 {
                    return Err(Error::InvalidData(
                        "forecast.horizon_months must be at least 1".into(),
                    ));
                }
                config.forecast.horizon_months = horizon;
            }
            if let Some(path) = forecast.output_path {
                config.forecast.output_path = path;
            }
        }

        if let Some(goal) = raw.goal {
            if let Some(target) = goal.default_target {
                config.goal.default_target = target;
            }
        }

        if let Some(model) = raw.model {
            if let Some(store) = model.store {
                config.model.store = store.parse().map_err(Error::InvalidData)?;
            }
            if let Some(path) = model.path {
                config.model.path = path;
            }
        }

        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("goalcast").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    goal: Option<RawGoal>,
    model: Option<RawModel>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    horizon_months: Option<usize>,
    output_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawGoal {
    default_target: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    store: Option<String>,
    path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(config.forecast.horizon_months, defaults.forecast.horizon_months);
        assert_eq!(config.forecast.output_path, defaults.forecast.output_path);
        assert_eq!(config.goal.default_target, 50000.0);
        assert_eq!(config.model.store, StoreKind::Database);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::parse(
            r#"
            [model]
            store = "file"
            path = "/tmp/model.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.store, StoreKind::File);
        assert_eq!(config.model.path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.forecast.horizon_months, 3);
    }

    #[test]
    fn test_invalid_store_kind() {
        let result = Config::parse("[model]\nstore = \"s3\"\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = Config::parse("[forecast]\nhorizon_months = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[goal]\ndefault_target = 1200.5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.goal.default_target, 1200.5);

        let missing = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(missing.is_err());
    }
}
