//! Configuration management for `Kravinka`
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::KravinkaError;
use crate::models::ReferencePoint;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Root configuration structure, built once at startup and passed into the pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KravinkaConfig {
    /// Dataset source configuration
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// GPX output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Proximity and icon filtering
    #[serde(default)]
    pub filter: FilterConfig,
    /// Link templates for waypoints
    #[serde(default)]
    pub links: LinksConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Endpoint returning the JSON listing
    #[serde(default = "default_dataset_url")]
    pub url: String,
    /// Reuse the cache file instead of downloading when it exists
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Raw response bytes are stored here
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// GPX output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Maximum number of waypoints written
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub pretty_print: bool,
    /// Value of the `creator` attribute
    #[serde(default = "default_creator")]
    pub creator: String,
}

/// Acceptance criteria for points of interest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_reference_points")]
    pub reference_points: Vec<ReferencePoint>,
    /// Accepted icon file names; `None` accepts every icon
    #[serde(default)]
    pub icon_allow_list: Option<BTreeSet<String>>,
    /// Append the detail page URL to each waypoint caption
    #[serde(default)]
    pub append_detail_link: bool,
}

/// URL templates used to build waypoint links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// The record id is appended to this prefix
    #[serde(default = "default_detail_url_prefix")]
    pub detail_url_prefix: String,
    /// Icon paths are resolved against this base
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_dataset_url() -> String {
    "https://www.vodnimlyny.cz/en/?do=getEstates".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("dataset.json")
}

fn default_timeout() -> u32 {
    30
}

fn default_output_path() -> PathBuf {
    PathBuf::from("final.gpx")
}

fn default_limit() -> usize {
    99_000
}

fn default_creator() -> String {
    "kravinka".to_string()
}

fn default_reference_points() -> Vec<ReferencePoint> {
    vec![ReferencePoint::new("Prague", 50.0755, 14.4378, 150.0)]
}

fn default_detail_url_prefix() -> String {
    "https://www.vodnimlyny.cz/en/?do=estateInfo&estateId=".to_string()
}

fn default_image_base_url() -> String {
    "https://www.vodnimlyny.cz".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: default_dataset_url(),
            cache_enabled: default_cache_enabled(),
            cache_path: default_cache_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            limit: default_limit(),
            pretty_print: false,
            creator: default_creator(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            reference_points: default_reference_points(),
            icon_allow_list: None,
            append_detail_link: false,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            detail_url_prefix: default_detail_url_prefix(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LinksConfig {
    /// Detail page of a record
    #[must_use]
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}{id}", self.detail_url_prefix)
    }

    /// Absolute URL of a record's icon
    #[must_use]
    pub fn image_url(&self, icon_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            icon_path.trim_start_matches('/')
        )
    }
}

impl KravinkaConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Working directory first, then the per-user config dir
        let config_file = config_path.unwrap_or_else(|| {
            let local = PathBuf::from("kravinka.toml");
            if local.exists() {
                local
            } else {
                Self::get_config_path().unwrap_or(local)
            }
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides, e.g. KRAVINKA_OUTPUT__LIMIT=500
        builder = builder.add_source(
            Environment::with_prefix("KRAVINKA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: KravinkaConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kravinka").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_reference_points()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the proximity filter
    fn validate_reference_points(&self) -> Result<()> {
        if self.filter.reference_points.is_empty() {
            return Err(
                KravinkaError::config("At least one reference point is required").into(),
            );
        }

        for point in &self.filter.reference_points {
            if !(-90.0..=90.0).contains(&point.latitude) {
                return Err(KravinkaError::config(format!(
                    "Reference point '{}' has latitude {} outside [-90, 90]",
                    point.name, point.latitude
                ))
                .into());
            }
            if !(-180.0..=180.0).contains(&point.longitude) {
                return Err(KravinkaError::config(format!(
                    "Reference point '{}' has longitude {} outside [-180, 180]",
                    point.name, point.longitude
                ))
                .into());
            }
            if !point.threshold_km.is_finite() || point.threshold_km < 0.0 {
                return Err(KravinkaError::config(format!(
                    "Reference point '{}' needs a non-negative threshold, got {}",
                    point.name, point.threshold_km
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.output.limit == 0 {
            return Err(KravinkaError::config("Output limit must be at least 1").into());
        }

        if self.dataset.timeout_seconds == 0 || self.dataset.timeout_seconds > 300 {
            return Err(KravinkaError::config(
                "Dataset timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(KravinkaError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(KravinkaError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Dataset URL", &self.dataset.url),
            ("Detail URL prefix", &self.links.detail_url_prefix),
            ("Image base URL", &self.links.image_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(KravinkaError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        if self.output.creator.trim().is_empty() {
            return Err(KravinkaError::config("GPX creator cannot be empty").into());
        }

        Ok(())
    }
}
