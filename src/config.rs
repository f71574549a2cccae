// src/config.rs

//! Reporter configuration.
//!
//! The bucket and object key shape are carried in [`ReporterConfig`] and
//! handed to the reporter at construction. Values come from defaults, an
//! optional TOML file, and (for Lambda) environment overrides.
//!
//! ## Environment Variables
//!
//! - `REPORT_BUCKET`: target bucket (default: `ec2-invoke-logs`)
//! - `REPORT_KEY_PREFIX`: object key prefix (default: `EC2_`)
//! - `REPORT_KEY_SUFFIX`: object key suffix (default: `.txt`)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_BUCKET: &str = "ec2-invoke-logs";
pub const DEFAULT_KEY_PREFIX: &str = "EC2_";
pub const DEFAULT_KEY_SUFFIX: &str = ".txt";

/// Where and under which key shape reports are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Target bucket name
    pub bucket: String,

    /// Prepended to the event name in every object key
    pub key_prefix: String,

    /// Appended after the generation timestamp
    pub key_suffix: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
        }
    }
}

impl ReporterConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `REPORT_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bucket) = lookup("REPORT_BUCKET") {
            self.bucket = bucket;
        }
        if let Some(prefix) = lookup("REPORT_KEY_PREFIX") {
            self.key_prefix = prefix;
        }
        if let Some(suffix) = lookup("REPORT_KEY_SUFFIX") {
            self.key_suffix = suffix;
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(AppError::validation("bucket is empty"));
        }
        if self.key_suffix.is_empty() {
            return Err(AppError::validation("key_suffix is empty"));
        }
        if self.key_prefix.contains('/') || self.key_suffix.contains('/') {
            return Err(AppError::validation(
                "key_prefix and key_suffix must not contain '/'",
            ));
        }
        Ok(())
    }
}
