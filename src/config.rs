//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/netmap/netmap.toml`
//! 3. Local config: file passed explicitly (e.g. `--config`)
//! 4. Environment variables: `NETMAP_*` prefix, `__` as section separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{AggregatorKind, NormalizerKind, DEFAULT_IQR_K};

/// How node attributes become weights and how weights roll up the tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightingConfig {
    /// Normalizer applied to capacity (reference: its statistic over all nodes)
    pub capacity_norm: NormalizerKind,
    /// Normalizer applied to price
    pub price_norm: NormalizerKind,
    /// Aggregator used at every bucket during rollup
    pub rollup: AggregatorKind,
    /// Fence multiplier for the `mean-iqr` aggregator
    pub iqr_k: f64,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            capacity_norm: NormalizerKind::Sigmoid,
            price_norm: NormalizerKind::ReverseMin,
            rollup: AggregatorKind::Mean,
            iqr_k: DEFAULT_IQR_K,
        }
    }
}

/// Raw weighting config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawWeightingConfig {
    pub capacity_norm: Option<NormalizerKind>,
    pub price_norm: Option<NormalizerKind>,
    pub rollup: Option<AggregatorKind>,
    pub iqr_k: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub weighting: RawWeightingConfig,
}

impl WeightingConfig {
    /// Overlay wins wherever it specifies a value.
    pub fn merge(&self, overlay: &RawWeightingConfig) -> Self {
        Self {
            capacity_norm: overlay.capacity_norm.unwrap_or(self.capacity_norm),
            price_norm: overlay.price_norm.unwrap_or(self.price_norm),
            rollup: overlay.rollup.unwrap_or(self.rollup),
            iqr_k: overlay.iqr_k.unwrap_or(self.iqr_k),
        }
    }
}

/// Unified configuration for netmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub weighting: WeightingConfig,
}

/// Get the XDG config directory for netmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "netmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("netmap.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            weighting: self.weighting.merge(&overlay.weighting),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_path` - Optional config file; it must exist when given
    pub fn load(local_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit local config
        if let Some(path) = local_path {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply NETMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NETMAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<NormalizerKind>(&config, "weighting.capacity_norm")? {
            settings.weighting.capacity_norm = val;
        }
        if let Some(val) = env_value::<NormalizerKind>(&config, "weighting.price_norm")? {
            settings.weighting.price_norm = val;
        }
        if let Some(val) = env_value::<AggregatorKind>(&config, "weighting.rollup")? {
            settings.weighting.rollup = val;
        }
        if let Some(val) = env_value::<f64>(&config, "weighting.iqr_k")? {
            settings.weighting.iqr_k = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# netmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/netmap/netmap.toml
#   Local:  file given with --config
#   Env:    NETMAP_WEIGHTING__<FIELD> environment variables

[weighting]
# Capacity normalizer: sigmoid | reverse-min | max
# capacity_norm = "sigmoid"

# Price normalizer: sigmoid | reverse-min | max
# price_norm = "reverse-min"

# Bucket rollup aggregator: mean | mean-sum | min | max | mean-iqr
# rollup = "mean"

# Interquartile fence multiplier for mean-iqr
# iqr_k = 1.5
"#
        .to_string()
    }
}

/// A present but unparsable variable is an error; an absent one is `None`.
fn env_value<T>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError>
where
    T: for<'de> Deserialize<'de>,
{
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
