use crate::domain::{Column, IssueId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("No board data available from storage or remote source")]
    DataUnavailable,

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Index {index} out of range for column {column} (len {len})")]
    OutOfRange {
        column: Column,
        index: usize,
        len: usize,
    },

    #[error("Duplicate issue ID: {0}")]
    DuplicateId(IssueId),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(IssueId),

    #[error("Title is required")]
    EmptyTitle,

    #[error("Remote source error: {0}")]
    RemoteError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
