//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::ConnectionId;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Missing {0}")]
    EmptyIdentifier(&'static str),

    #[error("{kind} too long: max {max} bytes")]
    IdentifierTooLong { kind: &'static str, max: usize },

    // =========================================================================
    // State Errors
    // =========================================================================
    #[error("Connection is not registered: {0}")]
    ConnectionNotRegistered(ConnectionId),

    #[error("Connection already registered: {0}")]
    ConnectionAlreadyRegistered(ConnectionId),
}

impl DomainError {
    /// Get an error code string for wire responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier(_) => "MISSING_FIELD",
            Self::IdentifierTooLong { .. } => "FIELD_TOO_LONG",
            Self::ConnectionNotRegistered(_) => "CONNECTION_CLOSED",
            Self::ConnectionAlreadyRegistered(_) => "CONNECTION_EXISTS",
        }
    }
}
