//! Error types for assetry-client

use thiserror::Error;

/// Result type alias for assetry-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the remote store
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from assetry-core (validation, translation, transitions)
    #[error("Core error: {0}")]
    Core(#[from] assetry_core::Error),

    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Remote store returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// A response body that is not the JSON the dialect promises
    #[error("Unexpected response from '{table}': {message}")]
    Decode {
        /// Table the request addressed
        table: String,
        /// What was wrong with it
        message: String,
    },

    /// No row with the given id exists
    #[error("No row '{id}' in table '{table}'")]
    NotFound {
        /// Table searched
        table: String,
        /// Missing id
        id: String,
    },

    /// The store cannot be reached at all
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a decode error for the given table.
    pub fn decode(table: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error for the given table and id.
    pub fn not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            table: table.into(),
            id: id.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Returns `true` for errors raised before any request left the client
    /// (validation, unknown fields, bad transitions).
    pub fn is_rejected_locally(&self) -> bool {
        matches!(self, Error::Core(_) | Error::Config(_))
    }

    /// Returns the core error, if this wraps one.
    pub fn as_core(&self) -> Option<&assetry_core::Error> {
        match self {
            Error::Core(err) => Some(err),
            _ => None,
        }
    }
}
