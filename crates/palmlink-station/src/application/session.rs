//! The session context: all state shared between the frame loop and the HTTP
//! handlers.
//!
//! One `SessionContext` exists per process. Each field is internally
//! synchronized, so components receive an `Arc<SessionContext>` and never
//! coordinate locking among themselves:
//!
//! - `mode` is a single atomic word (read once per frame, written by the
//!   switch endpoint).
//! - `relay` takes its own lock for report/consume.
//! - `text` takes its own lock for append/snapshot.
//! - `running` is the shutdown flag checked at frame and accept boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use palmlink_core::{CursorRelay, Mode, ModeController};
use uuid::Uuid;

/// Text typed through the virtual keyboard during this session.
///
/// Appended on every accepted key press; readers take a snapshot. The buffer
/// is unbounded within a session — display truncation (e.g. the last 50
/// characters on the overlay) is the caller's concern.
#[derive(Debug, Default)]
pub struct TextBuffer {
    inner: Mutex<String>,
}

impl TextBuffer {
    /// Appends one key label (the uppercase region label).
    pub fn push_label(&self, label: &str) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).push_str(label);
    }

    /// The full buffer contents.
    pub fn snapshot(&self) -> String {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Shared state of the single active session.
pub struct SessionContext {
    /// Stamped once at startup; carried on every dispatch record.
    pub session_id: Uuid,
    /// Current interaction mode.
    pub mode: ModeController,
    /// The relay polled by the remote receiver.
    pub relay: CursorRelay,
    /// Text typed through the virtual keyboard.
    pub text: TextBuffer,
    running: AtomicBool,
}

impl SessionContext {
    /// Creates a running session in `mouse` mode with a fresh session id.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            mode: ModeController::new(Mode::Mouse),
            relay: CursorRelay::new(),
            text: TextBuffer::default(),
            running: AtomicBool::new(true),
        }
    }

    /// `true` until shutdown has been requested.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Requests shutdown. The frame loop exits at the next frame boundary;
    /// the HTTP accept loop exits at its next flag check.
    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
