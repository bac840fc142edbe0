use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analytics::{AnalyticsConfig, CycleAnalyzer};
use crate::cache::{AnalyticsCache, DEFAULT_CACHE_CAPACITY};
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Analytics defaults and thresholds
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,

    /// Analytics cache settings
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Analytics cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache analytics results per record snapshot
    pub enabled: bool,

    /// Maximum number of cached snapshots
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: true,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            analytics: AnalyticsConfig::default(),
            logging: LogConfig::default(),
            cache: CacheSettings::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".periodrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "Config not loaded, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Analyzer using the configured defaults and thresholds
    pub fn analyzer(&self) -> CycleAnalyzer {
        CycleAnalyzer::with_config(self.analytics.clone())
    }

    /// Analytics cache sized from the settings; `None` when caching is disabled
    pub fn analytics_cache(&self) -> Option<AnalyticsCache> {
        self.cache
            .enabled
            .then(|| AnalyticsCache::new(self.cache.capacity))
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let analytics = &self.analytics;
        if analytics.default_cycle_length <= 0.0 {
            anyhow::bail!(
                "default_cycle_length must be positive, got: {}",
                analytics.default_cycle_length
            );
        }
        if analytics.default_period_length <= 0.0 {
            anyhow::bail!(
                "default_period_length must be positive, got: {}",
                analytics.default_period_length
            );
        }
        if analytics.max_cycle_length_days <= 0 {
            anyhow::bail!(
                "max_cycle_length_days must be positive, got: {}",
                analytics.max_cycle_length_days
            );
        }
        if analytics.outlier_threshold < 0.0 {
            anyhow::bail!(
                "outlier_threshold must not be negative, got: {}",
                analytics.outlier_threshold
            );
        }
        Ok(())
    }
}
