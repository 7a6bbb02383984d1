//! Error types for the Assetry core library.

use crate::types::{EntityKind, Transition};

/// Errors raised by the entity model, patches and status transitions.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A draft record failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation, in UI naming
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A patch or lookup named a field the entity does not translate
    #[error("Unknown field '{field}' for {kind}")]
    UnknownField {
        /// Entity kind the field was looked up on
        kind: EntityKind,
        /// Offending UI field name
        field: String,
    },

    /// A record could not be found by id
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind that was searched
        kind: EntityKind,
        /// Id that was not found
        id: String,
    },

    /// A status change that the triage state machine does not allow
    #[error("Cannot {transition} a record that is {from}")]
    InvalidTransition {
        /// Current status, in wire vocabulary
        from: String,
        /// Requested transition
        transition: Transition,
    },

    /// Row or record JSON that does not have the expected shape
    #[error("Malformed record: {message}")]
    Malformed {
        /// Description of the shape problem
        message: String,
    },

    /// An entity kind name that is not recognised
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new malformed-record error.
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Error::Malformed {
            message: message.into(),
        }
    }

    /// Creates a not-found error for the given kind and id.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns the UI field name attached to a validation error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            Error::UnknownField { field, .. } => Some(field),
            _ => None,
        }
    }
}
