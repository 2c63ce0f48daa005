//! Per-key minimum re-fire interval.
//!
//! A fingertip resting on a key region would otherwise produce a key press on
//! every processed frame, 15–30 times a second. The debouncer is the only
//! gate between the hit test and the dispatcher: a press for label `L` is
//! accepted only if at least the debounce window has elapsed since the
//! previous *accepted* press of `L`.
//!
//! State is single-writer (only the frame loop calls [`Debouncer::accept`])
//! and therefore unlocked. Entries are overwritten on each accepted fire and
//! never deleted; a stale entry is simply an entry whose window has elapsed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default minimum interval between two accepted presses of the same key.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Tracks the last accepted fire time per key label.
#[derive(Debug)]
pub struct Debouncer {
    last_fire: HashMap<&'static str, Instant>,
    window: Duration,
}

impl Debouncer {
    /// Creates a debouncer with the default 300 ms window.
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW)
    }

    /// Creates a debouncer with a custom window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            last_fire: HashMap::new(),
            window,
        }
    }

    /// Decides whether a press of `label` at time `now` may fire.
    ///
    /// Returns `true` — and records `now` as the new last-fire time — iff no
    /// prior fire is recorded for `label`, or at least the window has elapsed
    /// since the previous accepted fire. Otherwise returns `false` and leaves
    /// the recorded time unchanged, so a continuously held key fires at most
    /// once per window rather than drifting.
    pub fn accept(&mut self, label: &'static str, now: Instant) -> bool {
        match self.last_fire.get(label) {
            Some(&last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_fire.insert(label, now);
                true
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
