//! Error types for leafcheck-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded bytes could not be decoded as an image.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The inference backend was unreachable, failed, or answered with
    /// something that is not a usable probability vector.
    #[error("Inference unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller (not the service) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidImage(_))
    }
}
