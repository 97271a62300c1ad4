//! Content-length probe (HEAD-style metadata request).

use crate::retry::TransferError;
use std::str;
use std::time::Duration;

/// Asks the server for the size of `url` without fetching the body.
///
/// Follows redirects. Returns `Ok(Some(len))` when the final response is 200
/// with a parseable `Content-Length`, `Ok(None)` when it is 200 without one.
/// Non-200 statuses and curl failures come back as errors so the retry layer
/// can classify them; callers treat an unprobeable URL as size unknown, not
/// as fatal.
pub fn content_length(
    url: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<Option<u64>, TransferError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(user_agent)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code != 200 {
        return Err(TransferError::Http(code));
    }

    Ok(parse_content_length(&headers))
}

/// Parses `Content-Length` out of collected header lines.
///
/// With redirects followed, the lines contain one block per hop; state is
/// reset at every `HTTP/` status line so only the final response counts.
/// Only all-digit values are accepted.
pub(crate) fn parse_content_length(lines: &[String]) -> Option<u64> {
    let mut content_length = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                let value = value.trim();
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    content_length = value.parse::<u64>().ok();
                }
            }
        }
    }
    content_length
}
