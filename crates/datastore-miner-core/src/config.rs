//! Configuration management for the datastore miner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::correlation::CorrelatorVariant;
use crate::error::{MinerError, MinerResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MinerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl MinerConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{DATASTORE_MINER_ENV}.toml (environment-specific)
    /// 3. Environment variables with DATASTORE_MINER prefix
    pub fn load() -> MinerResult<Self> {
        let env =
            std::env::var("DATASTORE_MINER_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("DATASTORE_MINER").separator("__"));

        let config: MinerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> MinerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: MinerConfig = toml::from_str(&content)
            .map_err(|e| MinerError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> MinerResult<()> {
        if self.correlation.neighbours == 0 {
            return Err(MinerError::ConfigError(
                "correlation.neighbours must be greater than 0".into(),
            ));
        }

        if !self.correlation.self_weight.is_finite() || !self.correlation.neighbour_weight.is_finite()
        {
            return Err(MinerError::ConfigError(
                "correlation weights must be finite".into(),
            ));
        }

        let c = &self.clustering;
        if !(c.sweep_step > 0.0) {
            return Err(MinerError::ConfigError(
                "clustering.sweep_step must be greater than 0".into(),
            ));
        }
        if c.sweep_start > c.sweep_end {
            return Err(MinerError::ConfigError(format!(
                "clustering.sweep_start ({}) must not exceed clustering.sweep_end ({})",
                c.sweep_start, c.sweep_end
            )));
        }

        if !matches!(self.export.format.as_str(), "pajek" | "gexf") {
            return Err(MinerError::ConfigError(format!(
                "export.format must be \"pajek\" or \"gexf\", got \"{}\"",
                self.export.format
            )));
        }

        if let Some(parent) = self.ledger.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(MinerError::ConfigError(format!(
                    "ledger.path parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset.
    pub level: String,
    /// "pretty" or "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorrelationConfig {
    pub variant: CorrelatorVariant,
    /// K for the nearest-neighbour variant.
    pub neighbours: usize,
    pub self_weight: f64,
    pub neighbour_weight: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            variant: CorrelatorVariant::Fast,
            neighbours: 5,
            self_weight: crate::correlation::KNN_SELF_WEIGHT,
            neighbour_weight: crate::correlation::KNN_NEIGHBOUR_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spatial_correlate.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusteringConfig {
    pub threshold: f32,
    pub sweep_start: f32,
    pub sweep_end: f32,
    pub sweep_step: f32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            sweep_start: 0.0,
            sweep_end: 1.0,
            sweep_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub format: String,
    pub threshold: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: "gexf".to_string(),
            threshold: 0.5,
        }
    }
}
