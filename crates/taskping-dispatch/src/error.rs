use thiserror::Error;

/// Errors that abort a single dispatch tick (never the engine loop).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The task store read failed; the tick is skipped and the next
    /// interval retries.
    #[error("store read failed: {0}")]
    Store(#[from] taskping_store::StoreError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
