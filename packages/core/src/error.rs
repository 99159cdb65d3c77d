//! Error type shared by the HAL model, encoder and decoder.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors raised by relation collections, resources and the JSON codec.
///
/// Every error is raised at the point of violation; nothing is retried or
/// accumulated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HalError {
    /// A required argument was empty, blank or otherwise missing
    /// (e.g. a whitespace-only relation name or a blank `href`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A structurally legal call would break a model invariant: a second item
    /// in a singular relation, a non-curie under `curies`, an embedded resource
    /// under an undeclared relation, or a curie that is not templated.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The JSON input does not have the expected HAL shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The host serializer failed while encoding a resource.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Raised by a caller-supplied resolver; passed through unchanged.
    #[error("not found: {0}")]
    NotFound(String),
}

impl HalError {
    pub(crate) fn blank_relation() -> Self {
        HalError::InvalidArgument("relation name must not be empty or whitespace".into())
    }
}
