use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The requested task does not exist.
    #[error("task not found: {id}")]
    TaskNotFound { id: i64 },

    /// The referenced owner does not exist.
    #[error("owner not found: {id}")]
    OwnerNotFound { id: i64 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
