//! Error types for key_paragraphs
//!
//! Ranking itself never fails (an unusable request ranks to an empty map);
//! errors only come out of configuration handling.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors raised while building or loading a ranker configuration
#[derive(Debug, Error)]
pub enum RankError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the value
        message: String,
    },

    /// Configuration JSON could not be parsed.
    #[error("Configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RankError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
