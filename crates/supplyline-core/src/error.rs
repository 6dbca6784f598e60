//! Shared error type across supplyline crates.

use std::collections::BTreeMap;

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Per-field validation failure.
    ValidationFailed,
    /// Auth failed.
    AuthFailed,
    /// Entity does not exist.
    NotFound,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::ValidationFailed => "VALIDATION_FAILED",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SupplyError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(BTreeMap<String, String>),
    #[error("auth failed")]
    AuthFailed,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("internal: {0}")]
    Internal(String),
}

impl SupplyError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SupplyError::BadRequest(_) => ClientCode::BadRequest,
            SupplyError::Validation(_) => ClientCode::ValidationFailed,
            SupplyError::AuthFailed => ClientCode::AuthFailed,
            SupplyError::NotFound(_) => ClientCode::NotFound,
            SupplyError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Per-field problems, when this is a validation failure.
    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            SupplyError::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}
