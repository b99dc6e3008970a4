use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::batch::{DEFAULT_MAX_BATCH, DEFAULT_MIN_BATCH};
use crate::cache::{DEFAULT_FIFO_TTL, DEFAULT_MAX_SIZE};
use crate::classifier::{RegimeTable, DEFAULT_CONFIDENCE_WEIGHTS, DEFAULT_DISTRIBUTION};
use crate::retry::{BackoffPolicy, DEFAULT_BASE_FREQUENCY_HZ};

/// Configuration values that cannot be used as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("batch.min_batch ({min}) must be positive and less than batch.max_batch ({max})")]
    BatchBounds { min: usize, max: usize },
    #[error("cache.max_size must be at least 1")]
    CacheSize,
    #[error("retry.max_attempts must be at least 1")]
    RetryAttempts,
    #[error("retry.base_frequency_hz must be positive, got {0}")]
    BaseFrequency(f64),
    #[error("retry.growth_factor must be positive, got {0}")]
    GrowthFactor(f64),
}

/// Batch size bounds (`[batch]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub min_batch: usize,
    pub max_batch: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_batch: DEFAULT_MIN_BATCH,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }
}

/// Harmonic retry parameters (`[retry]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Base frequency; one period is `1 / base_frequency_hz` seconds.
    pub base_frequency_hz: f64,
    /// Maximum number of attempts per batch (including the first).
    pub max_attempts: u32,
    pub start_multiple: u32,
    pub growth_factor: f64,
    /// Cap on the harmonic multiple; built-in cap when missing or 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_multiple: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            base_frequency_hz: DEFAULT_BASE_FREQUENCY_HZ,
            max_attempts: policy.max_attempts,
            start_multiple: policy.start_multiple,
            growth_factor: policy.growth_factor,
            max_multiple: policy.max_multiple,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.max_attempts,
            start_multiple: self.start_multiple,
            growth_factor: self.growth_factor,
            max_multiple: self.max_multiple,
        }
    }
}

/// Cache sizing (`[cache]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Capacity of each of the three stores.
    pub max_size: usize,
    /// Lifetime of exploration entries, in seconds.
    pub fifo_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            fifo_ttl_secs: DEFAULT_FIFO_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn fifo_ttl(&self) -> Duration {
        Duration::from_secs(self.fifo_ttl_secs)
    }
}

/// Optional overrides for the classifier tables (`[classifier]` section).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_weights: Option<RegimeTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<RegimeTable>,
}

impl ClassifierConfig {
    pub fn confidence_weights(&self) -> RegimeTable {
        self.confidence_weights.unwrap_or(DEFAULT_CONFIDENCE_WEIGHTS)
    }

    pub fn distribution(&self) -> RegimeTable {
        self.distribution.unwrap_or(DEFAULT_DISTRIBUTION)
    }
}

/// Global configuration loaded from `~/.config/regimekit/config.toml`.
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl KernelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.batch.min_batch, self.batch.max_batch);
        if min == 0 || min >= max {
            return Err(ConfigError::BatchBounds { min, max });
        }
        if self.cache.max_size == 0 {
            return Err(ConfigError::CacheSize);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::RetryAttempts);
        }
        let hz = self.retry.base_frequency_hz;
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::BaseFrequency(hz));
        }
        let growth = self.retry.growth_factor;
        if !growth.is_finite() || growth <= 0.0 {
            return Err(ConfigError::GrowthFactor(growth));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("regimekit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Read and validate a config file.
pub fn load_from_path(path: &Path) -> Result<KernelConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: KernelConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Write `cfg` as pretty TOML, creating parent directories.
pub fn save_to_path(cfg: &KernelConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KernelConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = KernelConfig::default();
        save_to_path(&default_cfg, &path)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}
