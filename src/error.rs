use std::path::PathBuf;

use crate::task::TaskId;

/// Why an add was refused. Nothing is stored when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task description is empty")]
    EmptyDescription,
    #[error("due date {input:?} is not a YYYY-MM-DD calendar date")]
    InvalidDueDate { input: String },
}

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
