//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title length is outside the accepted 2..=200 range.
    #[error("invalid title length {0}, expected between 2 and 200 characters")]
    InvalidTitleLength(usize),

    /// The description exceeds the accepted maximum length.
    #[error("description length {0} exceeds the 2000 character maximum")]
    DescriptionTooLong(usize),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing history actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action: {0}")]
pub struct ParseHistoryActionError(pub String);
