use std::sync::Arc;

/// The result type returned by all adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for driver adapter operations.
///
/// Engine failures wrap their source in an [`Arc`] so the value emitted on a
/// client's event channel and the value returned to the caller of `query` are
/// the same underlying error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A failure raised by the embedded engine while executing a statement.
    /// Passed through unchanged: not recovered, not retried, not categorized.
    #[error("{0}")]
    Engine(Arc<rusqlite::Error>),

    /// Raised synchronously by `stream`. The embedded engine has no
    /// server-side cursor or streaming mode.
    #[error("streaming queries are not implemented for the embedded engine")]
    StreamingNotSupported,
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Engine(Arc::new(e))
    }
}
