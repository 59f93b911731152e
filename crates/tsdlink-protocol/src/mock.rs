//! In-process HTTP responder for tests.
//!
//! The server answers every request with the next queued [`MockResponse`]
//! (the last one repeats) and records what it received.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A canned response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Extra headers. A `Content-Length` given here is sent as is, even when
    /// it does not match the body.
    pub headers: Vec<(String, String)>,
    /// Body bytes (never sent for `HEAD`).
    pub body: Vec<u8>,
}

impl MockResponse {
    /// A `200 OK` response with the given body.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// An empty response with the given status.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let mut builder = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Body::from(self.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

/// A request as received by the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request method.
    pub method: String,
    /// Path and query string.
    pub target: String,
    /// Headers with lower-cased names, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Returns the first value of a header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body as text.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    queue: Mutex<VecDeque<MockResponse>>,
}

impl MockState {
    fn next_response(&self) -> MockResponse {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.unwrap_or_else(|| MockResponse::status(404))
    }
}

/// A running mock server; stops when dropped.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Binds to an ephemeral local port and starts serving `responses`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(responses: Vec<MockResponse>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            queue: Mutex::new(VecDeque::from(responses)),
        });

        let router = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&state));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Returns `http://127.0.0.1:<port><path>`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.as_str().to_string(),
            target,
            headers,
            body: body.to_vec(),
        });

    state.next_response().into_response()
}

/// Compresses `data` into a gzip member made of stored deflate blocks.
///
/// The output is a valid gzip stream any decoder accepts; it is only meant for
/// exercising decompression paths in tests.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    const MAX_BLOCK: usize = u16::MAX as usize;

    let mut out = vec![0x1f, 0x8b, 0x08, 0, 0, 0, 0, 0, 0, 0xff];
    let mut chunks = data.chunks(MAX_BLOCK).peekable();
    if chunks.peek().is_none() {
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xff, 0xff]);
    }
    while let Some(chunk) = chunks.next() {
        let last = chunks.peek().is_none();
        // Chunks never exceed MAX_BLOCK bytes.
        let len = chunk.len() as u16;
        out.push(u8::from(last));
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(chunk);
    }
    out.extend_from_slice(&crc32(data).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_gzip_layout() {
        let out = gzip(b"abc");
        assert_eq!(&out[..3], &[0x1f, 0x8b, 0x08]);
        assert_eq!(out[10], 0x01);
        assert_eq!(&out[11..15], &[3, 0, 0xfc, 0xff]);
        assert_eq!(&out[15..18], b"abc");
        assert_eq!(out.len(), 10 + 5 + 3 + 8);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let server = MockServer::start(vec![MockResponse::ok("hello")]).await.unwrap();
        let body = reqwest::Client::new()
            .post(server.url("/echo?x=1"))
            .body("payload")
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "hello");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/echo?x=1");
        assert_eq!(requests[0].body_text(), "payload");
    }

    #[tokio::test]
    async fn test_queue_advances_then_repeats() {
        let server = MockServer::start(vec![MockResponse::status(201), MockResponse::status(202)])
            .await
            .unwrap();
        let client = reqwest::Client::new();
        let mut statuses = Vec::new();
        for _ in 0..3 {
            let response = client.get(server.url("/")).send().await.unwrap();
            statuses.push(response.status().as_u16());
        }
        assert_eq!(statuses, [201, 202, 202]);
    }

    #[tokio::test]
    async fn test_empty_queue_answers_not_found() {
        let server = MockServer::start(Vec::new()).await.unwrap();
        let response = reqwest::get(server.url("/missing")).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }
}
