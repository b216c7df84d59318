//! Error types for dropboard-core
//!
//! One variant family per failure class so the orchestrator can tell a
//! transport failure apart from a rejected document or a decoration defect.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dropboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Fetch Errors
    // ===================
    #[error("Failed to fetch config from {url} after {attempts} attempts")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read config file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Validation Errors
    // ===================
    #[error("Config document rejected: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // ===================
    // Transform Errors
    // ===================
    #[error("Failed to process config: {message}")]
    Transform { message: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// True for failures that a retry might fix (transport only).
    ///
    /// A rejected document will be rejected again; retrying it only delays
    /// the error surfacing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Fetch { .. } | CoreError::FileRead { .. })
    }
}
