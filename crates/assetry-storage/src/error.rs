//! Error types for assetry-storage

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for assetry-storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur reading or writing the local cache
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from assetry-core
    #[error("Core error: {0}")]
    Core(#[from] assetry_core::Error),

    /// Filesystem error, with the path involved
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Cached JSON that does not parse
    #[error("Corrupt cache entry '{key}': {source}")]
    Corrupt {
        /// Cache key
        key: String,
        /// Parse error
        source: serde_json::Error,
    },

    /// Serialization failure while writing
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A key that cannot be used as a file name
    #[error("Invalid cache key '{0}'")]
    InvalidKey(String),
}

impl Error {
    /// Creates an I/O error tagged with a path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_io_with_path_display() {
        let err = Error::io_with_path(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            "/tmp/cache/assets.json",
        );
        assert_eq!(err.to_string(), "I/O error at /tmp/cache/assets.json: denied");
    }

    #[test]
    fn test_corrupt_display_names_key() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = Error::Corrupt {
            key: "licenses".into(),
            source,
        };
        assert!(err.to_string().starts_with("Corrupt cache entry 'licenses'"));
    }
}
