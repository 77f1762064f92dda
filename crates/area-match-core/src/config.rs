//! Matcher configuration.
//!
//! Resolved once at startup (usually from a JSON file) and passed into
//! [`AreaMatcher::with_config`](crate::matcher::AreaMatcher::with_config).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reorder::ReorderPolicy;

/// Default minimum confidence for reusing an existing area.
pub const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 60;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for area matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherConfig {
    /// Minimum score (1-100) for reusing an existing area
    pub confidence_threshold: u8,
    /// Facility names added to the built-in list
    pub extra_facilities: Vec<String>,
    /// Town names added to the built-in list
    pub extra_towns: Vec<String>,
    /// Abbreviations kept uppercase in department names (e.g., "MHSOP")
    pub extra_abbreviations: Vec<String>,
    /// Curtain changeover cycle
    pub reorder: ReorderPolicy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            extra_facilities: Vec::new(),
            extra_towns: Vec::new(),
            extra_abbreviations: Vec::new(),
            reorder: ReorderPolicy::default(),
        }
    }
}

impl MatcherConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=100).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidenceThreshold must be between 1 and 100, got {}",
                self.confidence_threshold
            )));
        }
        if self.reorder.cycle_months == 0 {
            return Err(ConfigError::Invalid(
                "reorder.cycleMonths must be at least 1".into(),
            ));
        }
        let blank = self
            .extra_facilities
            .iter()
            .chain(&self.extra_towns)
            .chain(&self.extra_abbreviations)
            .any(|name| name.trim().is_empty());
        if blank {
            return Err(ConfigError::Invalid("names cannot be empty".into()));
        }
        Ok(())
    }
}
