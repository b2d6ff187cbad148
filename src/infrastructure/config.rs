//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file, then `LISTING__*` environment variables
//! (e.g. `LISTING__EXTRACTION__MEMBERSHIP_THRESHOLD=0.75`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::inference::PolicyKind;

pub const ENV_PREFIX: &str = "LISTING";

pub mod defaults {
    pub const SIBLING_SIMILARITY_THRESHOLD: f64 = 0.9;
    pub const CLASS_GROUP_THRESHOLD: f64 = 0.8;
    pub const MEMBERSHIP_THRESHOLD: f64 = 0.8;
    pub const BOUNDARY_TAG: &str = "body";
    pub const MIN_DETECTION_SCORE: f64 = 0.001;
    pub const IOU_THRESHOLD: f64 = 0.005;
    pub const SEED_OFFSET: f64 = 5.0;
    pub const DETAIL_SEED_OFFSET: f64 = 40.0;
    pub const MAX_WORKERS: usize = 4;
    pub const MAX_WORKERS_LIMIT: usize = 16;
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "listing-inference.log";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub detection: DetectionConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

/// Thresholds and boundaries of the list extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sibling class-string similarity for the similarity predicate
    pub sibling_similarity_threshold: f64,

    /// Similarity needed to join a class cluster
    pub class_group_threshold: f64,

    /// Similarity to the dominant cluster's representative needed to keep a child
    pub membership_threshold: f64,

    /// Tag at which the upward search stops
    pub boundary_tag: String,

    /// Predicate policy; `None` lets the tree adapter decide
    pub policy: Option<PolicyKind>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sibling_similarity_threshold: defaults::SIBLING_SIMILARITY_THRESHOLD,
            class_group_threshold: defaults::CLASS_GROUP_THRESHOLD,
            membership_threshold: defaults::MEMBERSHIP_THRESHOLD,
            boundary_tag: defaults::BOUNDARY_TAG.to_string(),
            policy: None,
        }
    }
}

/// How detector output is turned into seed points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detections scoring below this are ignored
    pub min_score: f64,

    pub iou_threshold: f64,

    /// Added to a box's top-left corner to land inside the detected element
    pub seed_offset: f64,

    /// Corner offset for the single detail-page seed, in screenshot pixels
    pub detail_seed_offset: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_score: defaults::MIN_DETECTION_SCORE,
            iou_threshold: defaults::IOU_THRESHOLD,
            seed_offset: defaults::SEED_OFFSET,
            detail_seed_offset: defaults::DETAIL_SEED_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for multi-document extraction
    pub max_workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: defaults::MAX_WORKERS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console (stderr) output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file
    pub log_dir: String,

    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: defaults::LOG_DIR.to_string(),
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with environment variables only
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Defaults, then the file at `path` (if given), then environment variables
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("extraction.sibling_similarity_threshold", self.extraction.sibling_similarity_threshold),
            ("extraction.class_group_threshold", self.extraction.class_group_threshold),
            ("extraction.membership_threshold", self.extraction.membership_threshold),
            ("detection.min_score", self.detection.min_score),
            ("detection.iou_threshold", self.detection.iou_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::validation(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        let offsets = [
            ("detection.seed_offset", self.detection.seed_offset),
            ("detection.detail_seed_offset", self.detection.detail_seed_offset),
        ];
        for (name, value) in offsets {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.extraction.boundary_tag.trim().is_empty() {
            return Err(ConfigError::validation("extraction.boundary_tag cannot be empty"));
        }

        if !(1..=defaults::MAX_WORKERS_LIMIT).contains(&self.batch.max_workers) {
            return Err(ConfigError::validation(format!(
                "batch.max_workers must be between 1 and {}, got {}",
                defaults::MAX_WORKERS_LIMIT,
                self.batch.max_workers
            )));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !["error", "warn", "info", "debug", "trace"].contains(&level.as_str()) {
            return Err(ConfigError::validation(format!("unknown log level '{}'", self.logging.level)));
        }

        Ok(())
    }
}
