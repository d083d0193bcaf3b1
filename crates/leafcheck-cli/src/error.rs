//! Client-side errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot reach server at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
