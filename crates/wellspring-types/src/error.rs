//! Error taxonomy for Wellspring.
//!
//! Each collaborator boundary has its own error kind; failures cross
//! module boundaries as explicit `Result`s, never as panics. The HTTP
//! layer maps these onto status classes (client error for invalid input,
//! gateway error for dependency failure) with stable, non-leaking
//! detail strings.

use thiserror::Error;

/// Errors from persistence store operations (used by trait definitions
/// in wellspring-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from the completion provider boundary.
///
/// Internal detail (provider messages, timeouts) is preserved here for
/// logging; callers surface only a generic upstream failure.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("empty response from provider")]
    EmptyResponse,

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// Errors from the chat orchestration flow.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Bad caller input, rejected before any I/O.
    #[error("{0}")]
    Validation(String),

    /// Completion provider unreachable or returned an unusable payload.
    #[error("upstream completion failure: {0}")]
    Upstream(#[from] CompletionError),

    /// Store unreachable or rejected a critical-path read/write.
    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}
