//! Error types for assetry-cli

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for assetry-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in assetry-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from assetry-console
    #[error(transparent)]
    Console(#[from] assetry_console::Error),

    /// Error from assetry-client
    #[error(transparent)]
    Client(#[from] assetry_client::Error),

    /// Error from assetry-storage
    #[error(transparent)]
    Storage(#[from] assetry_storage::Error),

    /// Error from assetry-core
    #[error(transparent)]
    Core(#[from] assetry_core::Error),

    /// Bad or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad command-line input that clap could not catch
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// File-system failure on a known path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Writing to the terminal failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// JSON input or output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create an argument error.
    pub fn argument<S: Into<String>>(message: S) -> Self {
        Self::Argument(message.into())
    }

    /// Create an I/O error carrying the path involved.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
