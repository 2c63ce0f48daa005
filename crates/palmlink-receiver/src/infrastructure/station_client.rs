//! Thin HTTP client for the station's relay endpoint.
//!
//! The polling protocol is one `GET` per tick against a server that closes
//! the connection after each response, so the client is equally simple: open
//! a TCP connection, write one request, read to EOF, split the head from the
//! body, parse the JSON.
//!
//! Response parsing is a pure function ([`parse_response`]) so the
//! header-splitting and status handling are testable without sockets.

use std::net::SocketAddr;

use palmlink_core::protocol::CursorSnapshot;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Upper bound on a response we are willing to buffer.
const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Error type for relay polling.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Polls one station over its HTTP surface.
pub struct StationClient {
    addr: SocketAddr,
}

impl StationClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Performs one `GET /api/cursor` poll.
    ///
    /// On the station this *is* the consume: the returned snapshot's click
    /// flag has already been reset server-side, so the caller must act on it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for connection failures, non-200 statuses, or
    /// malformed bodies. All are transient from the protocol's point of
    /// view — a pending click survives on the station until a poll succeeds.
    pub async fn fetch_cursor(&self) -> Result<CursorSnapshot, ClientError> {
        let raw = self.exchange("GET", "/api/cursor").await?;
        let (status, body) = parse_response(&raw)?;
        if status != 200 {
            return Err(ClientError::Status(status));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Writes one request and reads the whole response (the server closes
    /// the connection after it).
    async fn exchange(&self, method: &str, path: &str) -> Result<Vec<u8>, ClientError> {
        let mut stream = TcpStream::connect(self.addr).await?;
        let request = format!(
            "{method} {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nAccept: application/json\r\n\r\n",
            self.addr
        );
        stream.write_all(request.as_bytes()).await?;

        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            if raw.len() > MAX_RESPONSE_BYTES {
                return Err(ClientError::Malformed("response too large".to_string()));
            }
        }
        Ok(raw)
    }
}

/// Splits a raw HTTP response into status code and body.
pub fn parse_response(raw: &[u8]) -> Result<(u16, Vec<u8>), ClientError> {
    let split = find_header_end(raw)
        .ok_or_else(|| ClientError::Malformed("missing header terminator".to_string()))?;
    let head = std::str::from_utf8(&raw[..split])
        .map_err(|_| ClientError::Malformed("non-UTF-8 header section".to_string()))?;

    let status_line = head
        .lines()
        .next()
        .ok_or_else(|| ClientError::Malformed("empty response".to_string()))?;
    let mut parts = status_line.split_whitespace();
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(ClientError::Malformed(format!(
            "bad status line: {status_line:?}"
        )));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| ClientError::Malformed(format!("bad status line: {status_line:?}")))?;

    Ok((status, raw[split + 4..].to_vec()))
}

/// Index of the `\r\n\r\n` separating headers from the body.
fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
