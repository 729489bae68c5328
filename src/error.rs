//! Error types for the static renderer

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or querying a tree
#[derive(Error, Debug)]
pub enum Error {
    /// The element tree was described incorrectly (bad props, tag, attribute)
    #[error("Invalid element: {0}")]
    ConstructionError(String),

    /// Rendering could not complete
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// A snapshot query could not be evaluated
    #[error("Query failed: {0}")]
    QueryError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error while writing a report
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Other(err.to_string())
    }
}
