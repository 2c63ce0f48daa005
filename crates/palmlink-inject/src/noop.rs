//! No-op injection backend.
//!
//! Used when the session runs headless (the hosted relay deployment has no
//! display to inject into) and as the fallback when a platform backend fails
//! to start. Every call succeeds and does nothing, so the rest of the
//! pipeline — relay reporting, event-sink auditing, the typed-text buffer —
//! behaves identically to a desktop session.

use palmlink_core::{InjectionError, InputInjector};
use tracing::trace;

/// An injector that accepts and discards every event.
#[derive(Debug, Default)]
pub struct NoopInjector;

impl NoopInjector {
    pub fn new() -> Self {
        Self
    }
}

impl InputInjector for NoopInjector {
    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        trace!("noop move_to({x}, {y})");
        Ok(())
    }

    fn click(&self) -> Result<(), InjectionError> {
        trace!("noop click");
        Ok(())
    }

    fn press_key(&self, key: &str) -> Result<(), InjectionError> {
        trace!("noop press_key({key})");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
