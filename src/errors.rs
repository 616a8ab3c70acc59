// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for askbase

use thiserror::Error;

/// Errors raised by the embedding, matching and storage layers
#[derive(Debug, Error)]
pub enum Error {
    /// The embedding model could not be initialised
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// Text-to-vector conversion failed for a request
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// SQLite error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Knowledge entry not found
    #[error("Entry not found: {0}")]
    NotFound(i64),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error means the answering service itself is broken,
    /// as opposed to a bad request or missing record.
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Self::ModelLoad(_) | Self::Embedding(_))
    }
}

/// Result type for askbase operations
pub type Result<T> = std::result::Result<T, Error>;
