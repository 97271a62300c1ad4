//! Bounded retry with exponential backoff for transport operations.
//!
//! Scope is a single HEAD or GET attempt; the surrounding fetch procedure is
//! never re-entered as a whole.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::classify;
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
