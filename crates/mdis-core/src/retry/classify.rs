//! Maps transfer errors onto retryable kinds.

use super::error::TransferError;
use super::policy::ErrorKind;

/// Statuses retried by policy: transient server-side failures.
const RETRYABLE_STATUSES: [u32; 4] = [500, 502, 503, 504];

/// Classifies a transfer error for the retry policy.
///
/// curl timeouts and connection-level failures are retryable, as are the
/// four transient 5xx statuses. Everything else (4xx and other statuses,
/// disk I/O, malformed URLs) is `Other` and fails immediately.
pub fn classify(err: &TransferError) -> ErrorKind {
    match err {
        TransferError::Curl(e) => {
            if e.is_operation_timedout() {
                ErrorKind::Timeout
            } else if e.is_couldnt_connect()
                || e.is_couldnt_resolve_host()
                || e.is_couldnt_resolve_proxy()
                || e.is_recv_error()
                || e.is_send_error()
                || e.is_got_nothing()
            {
                ErrorKind::Connection
            } else {
                ErrorKind::Other
            }
        }
        TransferError::Http(code) if RETRYABLE_STATUSES.contains(code) => {
            ErrorKind::Http5xx(*code as u16)
        }
        TransferError::Http(_) | TransferError::Io(_) => ErrorKind::Other,
    }
}
