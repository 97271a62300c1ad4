//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths. HEAD answers with Content-Length only;
//! GET streams the body. Options simulate the awkward servers the
//! downloader has to cope with: HEAD blocked, a Content-Length that lies,
//! and transient 500s.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ImageServerOptions {
    /// If false, HEAD returns 405 (simulates servers that block HEAD).
    pub head_allowed: bool,
    /// Content-Length advertised on HEAD responses; None means the real
    /// body length.
    pub head_declared_length: Option<u64>,
    /// Content-Length advertised on GET responses; None means the real
    /// body length. The body served is always the real one, so a larger
    /// declared value makes the connection close short.
    pub get_declared_length: Option<u64>,
    /// The first N GET requests return 500 before the server recovers.
    pub fail_first_gets: usize,
}

impl Default for ImageServerOptions {
    fn default() -> Self {
        Self {
            head_allowed: true,
            head_declared_length: None,
            get_declared_length: None,
            fail_first_gets: 0,
        }
    }
}

/// Handle to a running server: base URL plus request counters.
pub struct ImageServer {
    pub base_url: String,
    head_count: Arc<AtomicUsize>,
    get_count: Arc<AtomicUsize>,
}

impl ImageServer {
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn head_count(&self) -> usize {
        self.head_count.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `routes` (path, body)
/// pairs. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Vec<u8>)>) -> ImageServer {
    start_with_options(routes, ImageServerOptions::default())
}

/// Like `start` but allows customizing server behavior.
pub fn start_with_options(routes: Vec<(&str, Vec<u8>)>, opts: ImageServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, body)| (path.trim_start_matches('/').to_string(), body))
            .collect(),
    );
    let head_count = Arc::new(AtomicUsize::new(0));
    let get_count = Arc::new(AtomicUsize::new(0));
    let failures_left = Arc::new(AtomicUsize::new(opts.fail_first_gets));

    let heads = Arc::clone(&head_count);
    let gets = Arc::clone(&get_count);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let heads = Arc::clone(&heads);
            let gets = Arc::clone(&gets);
            let failures_left = Arc::clone(&failures_left);
            thread::spawn(move || handle(stream, &routes, opts, &heads, &gets, &failures_left));
        }
    });

    ImageServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        head_count,
        get_count,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Vec<u8>>,
    opts: ImageServerOptions,
    head_count: &AtomicUsize,
    get_count: &AtomicUsize,
    failures_left: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request(request);
    let body = routes.get(path);

    if method.eq_ignore_ascii_case("HEAD") {
        head_count.fetch_add(1, Ordering::SeqCst);
        if !opts.head_allowed {
            let _ = stream.write_all(
                b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n",
            );
            return;
        }
        let Some(body) = body else {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n");
            return;
        };
        let declared = opts.head_declared_length.unwrap_or(body.len() as u64);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        get_count.fetch_add(1, Ordering::SeqCst);
        let should_fail = failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            let payload = b"oops";
            let response = format!(
                "HTTP/1.1 500 Internal Server Error\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                payload.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(payload);
            return;
        }
        let Some(body) = body else {
            let payload = b"not found";
            let response = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                payload.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(payload);
            return;
        };
        let declared = opts.get_declared_length.unwrap_or(body.len() as u64);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
}

/// Returns (method, path without leading slash or query).
fn parse_request(request: &str) -> (&str, &str) {
    let request_line = request.lines().next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or(target);
    (method, path.trim_start_matches('/'))
}
