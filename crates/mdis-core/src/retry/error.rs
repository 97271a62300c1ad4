//! Transfer error type for retry classification.

use thiserror::Error;

/// Error from a single transport operation (one HEAD or one GET attempt).
/// Typed so the retry layer can classify it before it is folded into a
/// per-URL result message.
#[derive(Debug, Error)]
pub enum TransferError {
    /// curl reported a failure (timeout, connection, TLS, aborted body).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The response carried a non-200 status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed. Never retried.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}
