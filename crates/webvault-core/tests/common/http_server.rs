//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies per path, plain redirects, and 404 for anything else.
//! Every response closes the connection.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
struct Route {
    status: &'static str,
    location: Option<String>,
    body: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct TestServer {
    routes: HashMap<String, Route>,
}

impl TestServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 200 OK with `body` at `path`.
    pub fn page(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: "200 OK",
                location: None,
                body: body.into(),
            },
        );
        self
    }

    /// 404 with `body` at `path` (unknown paths get a default 404 too).
    pub fn not_found(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: "404 Not Found",
                location: None,
                body: body.into(),
            },
        );
        self
    }

    /// 302 from `path` to `target` (a path on this server).
    pub fn redirect(mut self, path: &str, target: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                status: "302 Found",
                location: Some(target.to_string()),
                body: Vec::new(),
            },
        );
        self
    }

    /// Starts the server in a background thread. Returns the base URL without a
    /// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
    pub fn start(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                thread::spawn(move || handle(stream, &routes));
            }
        });
        format!("http://127.0.0.1:{}", port)
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
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
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let fallback = Route {
        status: "404 Not Found",
        location: None,
        body: b"not found".to_vec(),
    };
    let route = routes.get(path).unwrap_or(&fallback);
    let location = route
        .location
        .as_deref()
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        route.status,
        route.body.len(),
        location
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

/// URL on a port nothing listens on (connection refused).
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
