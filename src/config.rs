//! Configuration for routinr.
//!
//! Loaded from YAML with a fallback chain:
//! 1. Explicit path if provided
//! 2. ./routinr.yml
//! 3. ~/.config/routinr/routinr.yml
//! 4. Defaults

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scheduler::{Engine, PriorityConfig, SchedulerConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Engine used when the CLI does not name one.
    pub engine: Engine,
    pub scheduler: SchedulerConfig,
    pub priority: PriorityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub catalog_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("routinr")
                .join("catalog.yml"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            engine: Engine::default(),
            scheduler: SchedulerConfig::default(),
            priority: PriorityConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try project config: ./<project>.yml
        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", project_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.increment_secs == 0 {
            eyre::bail!("scheduler.increment_secs must be > 0");
        }
        let early_stop = self.scheduler.early_stop_utilization;
        if early_stop.is_nan() || early_stop <= 0.0 {
            eyre::bail!("scheduler.early_stop_utilization must be > 0");
        }
        if self.priority.core < 0.0 || self.priority.optional < 0.0 {
            eyre::bail!("priority weights must not be negative");
        }
        Ok(())
    }

    /// Logger filter directives: `RUST_LOG` when set, else `log_level`, else "info".
    pub fn log_filters(&self, rust_log: Option<&str>) -> String {
        rust_log
            .map(str::trim)
            .filter(|filters| !filters.is_empty())
            .or(self.log_level.as_deref())
            .unwrap_or("info")
            .to_string()
    }

    /// Engine settings with the configured priority weights applied.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        self.scheduler.clone().with_priority(self.priority.clone())
    }
}
