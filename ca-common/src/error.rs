//! Common error types for the access-control workspace

use thiserror::Error;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the backend and the lookup client
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error
    #[error("Database error: {0}")]
    Database(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lookup record that does not match the wire contract
    #[error("Malformed lookup record: {0}")]
    MalformedRecord(String),
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err.to_string())
    }
}
