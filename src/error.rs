use thiserror::Error;

/// Errors raised by task mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be blank")]
    BlankTitle,
}

/// Errors raised by the explicit (user-initiated) storage paths.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse tasks: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid format: expected array")]
    InvalidFormat,
    #[error("Duplicate task id: {0}")]
    DuplicateId(String),
    #[error("Task {0} has a blank title")]
    BlankTitle(String),
    #[error("Failed to persist {path}: {message}")]
    Persist { path: String, message: String },
}

/// Lookup of a key outside the fixed reference tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Invalid weekday: {0}")]
    UnknownWeekday(String),
    #[error("Invalid category: {0}")]
    UnknownCategory(String),
    #[error("Invalid priority: {0}")]
    UnknownPriority(String),
}
