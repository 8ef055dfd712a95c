//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from upstream/IO errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A coordinate was malformed, non-finite or out of range
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}
