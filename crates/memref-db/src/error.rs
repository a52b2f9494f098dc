//! Error types for reference database operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during reference database operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefdbError {
    /// No reference with this name exists.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// A reference with this name already exists and `force` was not set.
    #[error("ref already exists: {name}")]
    AlreadyExists { name: String },

    /// The caller's expected prior value disagrees with the live one.
    #[error("ref was modified concurrently: {name}")]
    Modified { name: String },

    /// The request itself is malformed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The reference name breaks the naming rules.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A symbolic chain did not reach a direct reference in time.
    #[error("symbolic ref chain too deep or cyclic at: {name}")]
    SymbolicLoop { name: String },

    /// An allocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,

    /// The backend does not provide this capability.
    #[error("operation not implemented: {operation}")]
    Unimplemented { operation: &'static str },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Status values reported to the host engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Success,
    NotFound,
    AlreadyExists,
    Modified,
    InvalidInput,
    OutOfMemory,
    Unimplemented,
}

impl RefdbError {
    /// The status this error reports to the host.
    pub fn code(&self) -> ErrorCode {
        match self {
            RefdbError::NotFound { .. } => ErrorCode::NotFound,
            RefdbError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            RefdbError::Modified { .. } => ErrorCode::Modified,
            RefdbError::InvalidInput { .. }
            | RefdbError::InvalidName { .. }
            | RefdbError::SymbolicLoop { .. }
            | RefdbError::Config(_) => ErrorCode::InvalidInput,
            RefdbError::OutOfMemory => ErrorCode::OutOfMemory,
            RefdbError::Unimplemented { .. } => ErrorCode::Unimplemented,
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        RefdbError::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RefdbError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<std::collections::TryReserveError> for RefdbError {
    fn from(_: std::collections::TryReserveError) -> Self {
        RefdbError::OutOfMemory
    }
}

/// Status of a finished call, success included.
pub fn status_of<T>(result: &Result<T>) -> ErrorCode {
    match result {
        Ok(_) => ErrorCode::Success,
        Err(e) => e.code(),
    }
}

/// Convenience type alias for reference database operations.
pub type Result<T> = std::result::Result<T, RefdbError>;
