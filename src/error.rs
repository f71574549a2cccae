// src/error.rs

//! Unified error handling for the event reporter.

use std::fmt;

use thiserror::Error;

/// Result type alias for reporter operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required event field is absent
    #[error("Missing event field: {path}")]
    MissingField { path: String },

    /// An event field is present but has the wrong shape
    #[error("Invalid event field {path}: expected {expected}")]
    InvalidField { path: String, expected: &'static str },

    /// Object store write failed
    #[error("Storage write failed for '{key}': {message}")]
    Storage { key: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a missing-field error for a dotted field path.
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    /// Create an invalid-field error.
    pub fn invalid_field(path: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            path: path.into(),
            expected,
        }
    }

    /// Create a storage write error for the given object key.
    pub fn storage(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
