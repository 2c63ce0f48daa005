//! Minimal HTTP/1.1 request parsing and response writing.
//!
//! The relay protocol is deliberately thin — a handful of JSON resources,
//! one request per connection, `Connection: close`. That calls for a small
//! hand-rolled HTTP layer over `tokio::net`, not a web framework: parse the
//! request line, collect headers until the blank line, read a
//! `Content-Length` body, write a fixed response.
//!
//! Limits are enforced while reading: oversized header sections and bodies
//! are rejected rather than buffered.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on the header section (request line + headers).
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Upper bound on the request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Error type for request parsing.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("malformed request line: {0:?}")]
    BadRequestLine(String),

    #[error("invalid Content-Length header")]
    BadContentLength,

    #[error("request too large")]
    TooLarge,

    #[error("connection closed before a complete request")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Uppercase method token (`GET`, `POST`, …).
    pub method: String,
    /// Request path including any query string, e.g. `/api/cursor`.
    pub path: String,
    /// Raw request body; empty when no `Content-Length` was sent.
    pub body: Vec<u8>,
}

/// Reads one request from `reader`.
///
/// # Errors
///
/// Returns [`HttpError`] for malformed input, oversized requests, or a
/// connection that closes mid-request.
pub async fn read_request<R>(reader: &mut R) -> Result<HttpRequest, HttpError>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut header_bytes = 0usize;

    // ── Request line ──────────────────────────────────────────────────────────
    let request_line = read_crlf_line(reader, &mut header_bytes).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| HttpError::BadRequestLine(request_line.clone()))?
        .to_string();
    let path = parts
        .next()
        .ok_or_else(|| HttpError::BadRequestLine(request_line.clone()))?
        .to_string();
    let version = parts.next();
    if version.map_or(true, |v| !v.starts_with("HTTP/")) {
        return Err(HttpError::BadRequestLine(request_line));
    }

    // ── Headers ───────────────────────────────────────────────────────────────
    let mut content_length = 0usize;
    loop {
        let line = read_crlf_line(reader, &mut header_bytes).await?;
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| HttpError::BadContentLength)?;
            }
        }
    }

    // ── Body ──────────────────────────────────────────────────────────────────
    if content_length > MAX_BODY_BYTES {
        return Err(HttpError::TooLarge);
    }
    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader
            .read_exact(&mut body)
            .await
            .map_err(|_| HttpError::UnexpectedEof)?;
    }

    Ok(HttpRequest { method, path, body })
}

/// Reads one `\r\n`-terminated line, stripping the terminator, while
/// enforcing the header-section size limit.
async fn read_crlf_line<R>(reader: &mut R, consumed: &mut usize) -> Result<String, HttpError>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(HttpError::UnexpectedEof);
    }
    *consumed += n;
    if *consumed > MAX_HEADER_BYTES {
        return Err(HttpError::TooLarge);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

/// Writes a complete response with a JSON (or empty) body and closes the
/// exchange (`Connection: close`).
pub async fn write_response<W>(
    writer: &mut W,
    status: u16,
    body: &[u8],
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nConnection: close\r\nContent-Length: {}\r\n",
        status,
        reason_phrase(status),
        body.len()
    );
    if !body.is_empty() {
        head.push_str("Content-Type: application/json\r\n");
    }
    head.push_str("\r\n");

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await
}

/// Reason phrase for the status codes this service emits.
fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        501 => "Not Implemented",
        _ => "Internal Server Error",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
