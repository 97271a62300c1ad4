//! Streamed GET: response body into the temp file via curl callbacks.

use super::FetchOptions;
use crate::retry::TransferError;
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str;

/// Everything observed during one GET attempt.
struct BodyState {
    /// Status of the most recent response hop.
    status: Option<u32>,
    /// `Content-Length` announced by the most recent hop.
    content_length: Option<u64>,
    /// Open temp file; created on the first body byte of a 200 response.
    file: Option<File>,
    written: u64,
    /// Disk failure carried out of an aborted transfer, if any.
    io_error: Option<std::io::Error>,
}

/// A 200 GET whose body ended: the temp file holds `written` bytes, which
/// may fall short of the declared `content_length` when the server closed
/// early.
pub(crate) struct GetOutcome {
    pub written: u64,
    /// `Content-Length` announced by the final response, if any.
    pub content_length: Option<u64>,
}

/// Streams `url` into `temp_path`, truncating whatever was there.
///
/// The temp file is only created once a 200 body starts arriving, so error
/// responses leave no trace on disk. Returning `Ok(0)` from the write
/// callback aborts the transfer; the recorded state then tells a non-200
/// body apart from a disk failure.
pub(crate) fn get_to_file(
    url: &str,
    temp_path: &Path,
    options: &FetchOptions,
) -> Result<GetOutcome, TransferError> {
    let state = RefCell::new(BodyState {
        status: None,
        content_length: None,
        file: None,
        written: 0,
        io_error: None,
    });

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&options.user_agent)?;
    easy.buffer_size(options.chunk_size)?;
    easy.connect_timeout(options.timeout)?;
    // A stalled transfer counts as a timeout; a slow but moving one does not.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(options.timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                let line = line.trim();
                let mut s = state.borrow_mut();
                if line.starts_with("HTTP/") {
                    // New hop: the previous hop's headers no longer apply.
                    s.status = line.split_whitespace().nth(1).and_then(|c| c.parse().ok());
                    s.content_length = None;
                } else if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        let value = value.trim();
                        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                            s.content_length = value.parse().ok();
                        }
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            let mut s = state.borrow_mut();
            if s.status != Some(200) {
                return Ok(0);
            }
            if s.file.is_none() {
                match create_temp(temp_path) {
                    Ok(f) => s.file = Some(f),
                    Err(e) => {
                        s.io_error = Some(e);
                        return Ok(0);
                    }
                }
            }
            let written = match s.file.as_mut() {
                Some(f) => f.write_all(data),
                None => return Ok(0),
            };
            if let Err(e) = written {
                s.io_error = Some(e);
                return Ok(0);
            }
            s.written += data.len() as u64;
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let mut s = state.into_inner();
    s.file = None; // close before any rename or size check

    if let Err(e) = performed {
        if let Some(io) = s.io_error.take() {
            return Err(TransferError::Io(io));
        }
        if e.is_write_error() {
            if let Some(code) = s.status.filter(|&c| c != 200) {
                return Err(TransferError::Http(code));
            }
        }
        if e.is_partial_file() && s.status == Some(200) {
            // The server closed early after declaring a longer body. Report
            // what actually arrived; the caller's length check turns the
            // shortfall into an integrity failure instead of a retry.
            return Ok(GetOutcome {
                written: s.written,
                content_length: s.content_length,
            });
        }
        return Err(TransferError::Curl(e));
    }

    let code = easy.response_code()?;
    if code != 200 {
        // bodyless error responses never reach the write callback
        return Err(TransferError::Http(code));
    }

    if s.written == 0 && s.io_error.is_none() {
        // a 200 with an empty body skips the write callback too;
        // materialize the empty temp file so the rename has something to move
        create_temp(temp_path)?;
    }

    Ok(GetOutcome {
        written: s.written,
        content_length: s.content_length,
    })
}

/// Creates the temp file, making the destination directory first.
/// Truncates leftovers from an earlier attempt.
fn create_temp(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    File::create(path)
}
