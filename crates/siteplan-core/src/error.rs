//! Error types for siteplan

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteplanError {
    // Data loading errors
    #[error("Failed to load building data from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("Unsupported format '.{extension}'. Supported: {}", supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("{format} error: {message}")]
    FormatError { format: String, message: String },

    // Geometry errors
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Projection failed: {reason}")]
    Projection { reason: String },

    // Chat errors
    #[error("Chat completion request failed: {reason}")]
    RemoteCall { reason: String },

    // Session errors
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteplanError {
    /// Wrap any displayable failure as a data loading error for `path`
    pub fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap any displayable failure as a remote call error
    pub fn remote(reason: impl ToString) -> Self {
        Self::RemoteCall { reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, SiteplanError>;
