//! JSON message bodies of the station's HTTP surface.
//!
//! The protocol is deliberately thin: three resources, all JSON objects, all
//! carried over plain HTTP/1.1 so the capture and injection sides can sit
//! behind any hosting setup that forwards HTTP.
//!
//! | Route              | Body in            | Body out           |
//! |--------------------|--------------------|--------------------|
//! | `POST /switch`     | [`SwitchRequest`]  | [`SwitchResponse`] |
//! | `POST /api/cursor` | [`CursorReport`]   | [`OkResponse`]     |
//! | `GET  /api/cursor` | —                  | [`CursorSnapshot`] |
//! | `GET  /api/text`   | —                  | [`TextResponse`]   |
//!
//! Coordinates on the wire are always normalized to `[0,1]`; the consumer
//! scales them to its own screen resolution.

use serde::{Deserialize, Serialize};

use crate::domain::mode::Mode;
use crate::domain::relay::CursorState;

/// `POST /switch` request body: `{"mode":"mouse"}`.
///
/// Deserialization fails for any value other than the two recognized modes,
/// which the server maps to a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRequest {
    pub mode: Mode,
}

/// `POST /switch` success body: `{"status":"ok","mode":"keyboard"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchResponse {
    pub status: String,
    pub mode: Mode,
}

impl SwitchResponse {
    pub fn ok(mode: Mode) -> Self {
        Self {
            status: "ok".to_string(),
            mode,
        }
    }
}

/// Generic success body: `{"status":"ok"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub status: String,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Error body: `{"status":"error","message":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// `POST /api/cursor` request body.
///
/// All fields are optional. Present coordinates overwrite the stored ones;
/// absent coordinates leave them unchanged. `click` only ever *sets* the
/// pending flag — `false` and absent are equivalent and never clear it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click: Option<bool>,
}

/// `GET /api/cursor` response body.
///
/// Returning this snapshot *is* the consume operation: the server resets the
/// pending click in the same call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub x: f64,
    pub y: f64,
    pub click: bool,
    pub last_updated: f64,
}

impl From<CursorState> for CursorSnapshot {
    fn from(state: CursorState) -> Self {
        Self {
            x: state.x,
            y: state.y,
            click: state.click_pending,
            last_updated: state.last_updated,
        }
    }
}

/// `GET /api/text` response body: the session's typed-text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
