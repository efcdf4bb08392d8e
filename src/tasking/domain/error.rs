//! Error types for tasking domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain tasking values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskingDomainError {
    /// The actor identity is empty after trimming.
    #[error("actor identity must not be empty")]
    EmptyActorId,
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing task actions from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task action: {0}")]
pub struct ParseTaskActionError(pub String);
