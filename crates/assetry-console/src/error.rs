//! Error types for assetry-console

use thiserror::Error;

/// Result type alias for assetry-console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by console operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from assetry-core (validation, unknown fields, transitions)
    #[error(transparent)]
    Core(#[from] assetry_core::Error),

    /// Error from the remote gateway
    #[error(transparent)]
    Client(#[from] assetry_client::Error),

    /// Error from the local cache
    #[error(transparent)]
    Storage(#[from] assetry_storage::Error),
}

impl Error {
    /// The core error behind this one, if any, looking through the client
    /// layer.
    pub fn as_core(&self) -> Option<&assetry_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            Error::Client(e) => e.as_core(),
            Error::Storage(assetry_storage::Error::Core(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` when required-field validation failed.
    pub fn is_validation(&self) -> bool {
        matches!(self.as_core(), Some(assetry_core::Error::Validation { .. }))
    }

    /// Offending field of a validation or unknown-field error.
    pub fn field(&self) -> Option<&str> {
        self.as_core().and_then(assetry_core::Error::field)
    }

    /// Returns `true` when the remote store failed or refused the call.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Client(e) if assetry_client::is_remote_failure(e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetry_core::EntityKind;

    #[test]
    fn test_validation_is_seen_through_client_layer() {
        let err: Error = assetry_client::Error::from(assetry_core::Error::validation_field(
            "name",
            "name is required",
        ))
        .into();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("name"));
        assert!(!err.is_remote());
    }

    #[test]
    fn test_unavailable_is_remote() {
        let err: Error = assetry_client::Error::Unavailable("offline".into()).into();
        assert!(err.is_remote());
        assert!(err.as_core().is_none());
    }

    #[test]
    fn test_not_found_displays_transparently() {
        let err: Error = assetry_core::Error::not_found(EntityKind::Kit, "k-1").into();
        assert_eq!(
            err.to_string(),
            assetry_core::Error::not_found(EntityKind::Kit, "k-1").to_string()
        );
    }
}
