//! Error types for srs-core.

use thiserror::Error;

/// Result type alias using SrsError.
pub type Result<T> = std::result::Result<T, SrsError>;

/// Errors raised by the scheduling engine.
///
/// None of these are retryable: they signal a caller contract violation, and
/// the caller must not persist anything when one is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SrsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("review session is not in progress")]
    SessionFinished,

    #[error("not enough items for a quiz question: need {needed}, have {available}")]
    NotEnoughItems { needed: usize, available: usize },
}

impl SrsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
