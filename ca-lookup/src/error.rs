//! Error types for the lookup client
//!
//! Every variant is recovered inside the controller: a failed person lookup
//! becomes the danger banner, a failed photo fetch is only logged.

use thiserror::Error;

/// Failure of a lookup or photo request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Body could not be decoded into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// HTTP client could not be built
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl From<ca_common::Error> for LookupError {
    fn from(err: ca_common::Error) -> Self {
        match err {
            ca_common::Error::MalformedRecord(msg) => LookupError::Parse(msg),
            other => LookupError::Parse(other.to_string()),
        }
    }
}
