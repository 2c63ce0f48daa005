//! The station's HTTP service: accept loop and request routing.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting connections and handing each to its own Tokio task, so one
//!    slow client never blocks others.
//! 3. Parsing one request per connection and routing it against the session
//!    context (mode switch, relay report/consume, typed text, shutdown).
//! 4. Exiting cleanly when the session's running flag is cleared: the accept
//!    call runs under a short timeout so the loop re-checks the flag even
//!    when nothing is connecting.
//!
//! Routing itself is a pure function from request + session state to a
//! status and body, which keeps the whole protocol surface unit-testable
//! without sockets.

pub mod request;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info};

use palmlink_core::protocol::{
    CursorReport, CursorSnapshot, ErrorResponse, OkResponse, SwitchRequest, SwitchResponse,
    TextResponse,
};

use crate::application::session::SessionContext;
use request::{read_request, write_response, HttpRequest};

/// Runs the accept loop until the session's running flag is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, no
/// permission to bind).
pub async fn run_http_server(
    bind_addr: SocketAddr,
    ctx: Arc<SessionContext>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {bind_addr}"))?;

    info!("HTTP service listening on {bind_addr}");
    serve(listener, ctx).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
///
/// Split out from [`run_http_server`] so tests can bind an ephemeral port
/// first and learn the address before serving.
pub async fn serve(listener: TcpListener, ctx: Arc<SessionContext>) {
    loop {
        if !ctx.is_running() {
            info!("shutdown requested; stopping accept loop");
            break;
        }

        // Short timeout so the loop can re-check the running flag even when
        // no clients are connecting.
        match timeout(Duration::from_millis(200), listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, peer_addr, ctx).await {
                        debug!("connection {peer_addr} ended with error: {e:#}");
                    }
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g. out of file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout — loop back to check the running flag.
            }
        }
    }
}

/// Serves exactly one request on `stream` (`Connection: close`).
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    ctx: Arc<SessionContext>,
) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let (status, body) = match read_request(&mut reader).await {
        Ok(request) => {
            debug!("{peer_addr}: {} {}", request.method, request.path);
            route(&request, &ctx)
        }
        Err(e) => {
            debug!("{peer_addr}: unreadable request: {e}");
            error_body(400, "malformed request")
        }
    };

    write_response(&mut write_half, status, body.as_bytes()).await?;
    Ok(())
}

/// Maps one request to a status code and JSON body.
///
/// All protocol semantics live here: mode validation, the relay's
/// report/consume split, the typed-text snapshot, and remote shutdown.
pub fn route(request: &HttpRequest, ctx: &SessionContext) -> (u16, String) {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/switch") => switch_mode(&request.body, ctx),

        ("POST", "/api/cursor") => report_cursor(&request.body, ctx),

        ("GET", "/api/cursor") => {
            // Returning the snapshot *is* the consume: the pending click is
            // reset in the same relay call that produced it.
            let snapshot = CursorSnapshot::from(ctx.relay.consume());
            json_body(200, &snapshot)
        }

        ("GET", "/api/text") => {
            let response = TextResponse {
                text: ctx.text.snapshot(),
            };
            json_body(200, &response)
        }

        ("POST", "/quit") => {
            info!("shutdown requested over HTTP");
            ctx.request_shutdown();
            (204, String::new())
        }

        ("GET", "/video") => {
            // Video streaming is an external concern; this build has no
            // capture/encoding backend behind it.
            error_body(501, "video streaming is not available in this build")
        }

        _ => error_body(404, "not found"),
    }
}

fn switch_mode(body: &[u8], ctx: &SessionContext) -> (u16, String) {
    match serde_json::from_slice::<SwitchRequest>(body) {
        Ok(request) => {
            ctx.mode.set(request.mode);
            info!("mode switched to {}", request.mode);
            json_body(200, &SwitchResponse::ok(request.mode))
        }
        Err(e) => error_body(400, format!("invalid switch request: {e}")),
    }
}

fn report_cursor(body: &[u8], ctx: &SessionContext) -> (u16, String) {
    // An empty body is a valid no-field report.
    let parsed = if body.is_empty() {
        Ok(CursorReport::default())
    } else {
        serde_json::from_slice::<CursorReport>(body)
    };
    match parsed {
        Ok(report) => {
            ctx.relay
                .report_now(report.x, report.y, report.click.unwrap_or(false));
            json_body(200, &OkResponse::ok())
        }
        Err(e) => error_body(400, format!("invalid cursor report: {e}")),
    }
}

fn json_body<T: serde::Serialize>(status: u16, value: &T) -> (u16, String) {
    match serde_json::to_string(value) {
        Ok(body) => (status, body),
        Err(e) => {
            error!("response serialization failed: {e}");
            error_body(500, "internal error")
        }
    }
}

fn error_body(status: u16, message: impl Into<String>) -> (u16, String) {
    let body = serde_json::to_string(&ErrorResponse::new(message))
        .unwrap_or_else(|_| r#"{"status":"error","message":"internal error"}"#.to_string());
    (status, body)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use palmlink_core::Mode;

    fn request(method: &str, path: &str, body: &str) -> HttpRequest {
        HttpRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn ctx() -> SessionContext {
        SessionContext::new()
    }

    // ── /switch ───────────────────────────────────────────────────────────────

    #[test]
    fn test_switch_to_keyboard_returns_ok_and_applies() {
        let ctx = ctx();
        let (status, body) = route(&request("POST", "/switch", r#"{"mode":"keyboard"}"#), &ctx);
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"status":"ok","mode":"keyboard"}"#);
        assert_eq!(ctx.mode.get(), Mode::Keyboard);
    }

    #[test]
    fn test_switch_rejects_unknown_mode_with_400() {
        let ctx = ctx();
        let (status, body) = route(&request("POST", "/switch", r#"{"mode":"gamepad"}"#), &ctx);
        assert_eq!(status, 400);
        assert!(body.contains("\"status\":\"error\""));
        assert_eq!(ctx.mode.get(), Mode::Mouse, "mode unchanged on rejection");
    }

    #[test]
    fn test_switch_rejects_malformed_json_with_400() {
        let (status, _) = route(&request("POST", "/switch", "mode=keyboard"), &ctx());
        assert_eq!(status, 400);
    }

    // ── /api/cursor ───────────────────────────────────────────────────────────

    #[test]
    fn test_cursor_report_then_consume_roundtrip() {
        let ctx = ctx();
        let (status, _) = route(
            &request("POST", "/api/cursor", r#"{"x":0.5,"y":0.25,"click":true}"#),
            &ctx,
        );
        assert_eq!(status, 200);

        let (status, body) = route(&request("GET", "/api/cursor", ""), &ctx);
        assert_eq!(status, 200);
        let snapshot: CursorSnapshot = serde_json::from_str(&body).unwrap();
        assert_eq!((snapshot.x, snapshot.y), (0.5, 0.25));
        assert!(snapshot.click);
    }

    #[test]
    fn test_consume_resets_the_click_for_the_next_poll() {
        let ctx = ctx();
        route(&request("POST", "/api/cursor", r#"{"click":true}"#), &ctx);

        let (_, first) = route(&request("GET", "/api/cursor", ""), &ctx);
        let first: CursorSnapshot = serde_json::from_str(&first).unwrap();
        assert!(first.click);

        let (_, second) = route(&request("GET", "/api/cursor", ""), &ctx);
        let second: CursorSnapshot = serde_json::from_str(&second).unwrap();
        assert!(!second.click, "no intervening report: click must not replay");
    }

    #[test]
    fn test_click_survives_two_reports_and_fires_exactly_once() {
        let ctx = ctx();
        route(&request("POST", "/api/cursor", r#"{"click":true}"#), &ctx);
        route(&request("POST", "/api/cursor", r#"{"click":true}"#), &ctx);

        let (_, first) = route(&request("GET", "/api/cursor", ""), &ctx);
        assert!(serde_json::from_str::<CursorSnapshot>(&first).unwrap().click);
        let (_, second) = route(&request("GET", "/api/cursor", ""), &ctx);
        assert!(!serde_json::from_str::<CursorSnapshot>(&second).unwrap().click);
    }

    #[test]
    fn test_empty_cursor_report_is_accepted() {
        let (status, _) = route(&request("POST", "/api/cursor", ""), &ctx());
        assert_eq!(status, 200);
    }

    #[test]
    fn test_malformed_cursor_report_is_rejected() {
        let (status, _) = route(&request("POST", "/api/cursor", r#"{"x":"left"}"#), &ctx());
        assert_eq!(status, 400);
    }

    // ── /api/text ─────────────────────────────────────────────────────────────

    #[test]
    fn test_text_endpoint_returns_the_typed_buffer() {
        let ctx = ctx();
        ctx.text.push_label("H");
        ctx.text.push_label("I");

        let (status, body) = route(&request("GET", "/api/text", ""), &ctx);
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"text":"HI"}"#);
    }

    // ── /quit ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_clears_the_running_flag_and_returns_204() {
        let ctx = ctx();
        let (status, body) = route(&request("POST", "/quit", ""), &ctx);
        assert_eq!(status, 204);
        assert!(body.is_empty());
        assert!(!ctx.is_running());
    }

    // ── Misc routes ───────────────────────────────────────────────────────────

    #[test]
    fn test_video_route_is_not_implemented() {
        let (status, _) = route(&request("GET", "/video", ""), &ctx());
        assert_eq!(status, 501);
    }

    #[test]
    fn test_unknown_route_is_404() {
        let (status, _) = route(&request("GET", "/nope", ""), &ctx());
        assert_eq!(status, 404);
    }

    #[test]
    fn test_wrong_method_on_known_path_is_404() {
        // GET /switch is not part of the protocol surface.
        let (status, _) = route(&request("GET", "/switch", ""), &ctx());
        assert_eq!(status, 404);
    }
}
