//! Error types for the harness
//!
//! These are usage errors of the harness itself. They abort a run.
//! Misbehaving implementations never produce one of these; their outcomes
//! are recorded as `fail` or `error` results instead.

use thiserror::Error;

/// Harness usage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// An operation with this name is already registered
    #[error("operation '{0}' is already registered")]
    DuplicateName(String),

    /// No operation with this name is registered
    #[error("operation '{0}' is not registered")]
    NotFound(String),

    /// Operation names must be non-empty
    #[error("operation name must not be empty")]
    InvalidName,

    /// Case input count does not match the operation's arity
    #[error("operation '{operation}' takes {expected} input(s), case supplied {found}")]
    Arity {
        operation: String,
        expected: usize,
        found: usize,
    },

    /// Report was already finalized
    #[error("report is finalized; no further results can be recorded")]
    ClosedReport,

    /// Case has no expectation to check against
    #[error("case for '{0}' has an undetermined expectation and cannot be auto-verified")]
    Undetermined(String),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
