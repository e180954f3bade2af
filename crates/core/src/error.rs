//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic business failures only (validation, invariants, conflicts,
/// decoding of closed vocabularies).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A textual tag did not name any member of a closed vocabulary.
    #[error("unknown {vocabulary} value: {value:?}")]
    UnknownValue {
        vocabulary: &'static str,
        value: String,
    },

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. stale version, illegal state transition).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_value(vocabulary: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            vocabulary,
            value: value.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_value_message_names_vocabulary_and_input() {
        let err = DomainError::unknown_value("InvitationStatus", "OPEN");
        assert_eq!(err.to_string(), "unknown InvitationStatus value: \"OPEN\"");
    }

    #[test]
    fn constructors_map_to_variants() {
        assert_eq!(
            DomainError::conflict("stale"),
            DomainError::Conflict("stale".to_string())
        );
        assert_eq!(DomainError::not_found(), DomainError::NotFound);
        assert!(matches!(
            DomainError::validation("bad"),
            DomainError::Validation(msg) if msg == "bad"
        ));
    }
}
