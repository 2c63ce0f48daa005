//! Shared cursor relay state machine.
//!
//! The relay decouples gesture capture (the machine with the camera) from
//! input injection (the desktop being controlled) over a narrow HTTP polling
//! channel. This module holds the protocol's single piece of shared state and
//! enforces its two guarantees:
//!
//! - **Sticky click**: a report carrying `click = true` sets the pending flag
//!   and nothing but a consume clears it. Reports without a click never
//!   overwrite the flag to false, so a click survives any number of
//!   intervening reports and failed polls.
//! - **At-most-once delivery**: a consume returns the current snapshot and
//!   atomically resets the pending flag in the same critical section, so the
//!   click is observed by exactly one poll and never replayed.
//!
//! `clickPending` state machine:
//!
//! ```text
//! idle    --report(click=true)-->  pending
//! pending --consume-->             idle      (snapshot.click = true)
//! idle    --consume-->             idle      (snapshot.click = false)
//! pending --report(click=true)-->  pending   (idempotent)
//! ```
//!
//! No transition depends on elapsed time. `last_updated` is carried for
//! diagnostics only: a consumer polling after a long producer outage keeps
//! applying the stale coordinates. That staleness gap is part of the
//! protocol; do not add an expiry here.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of the relayed cursor.
///
/// `x` and `y` are normalized to `[0,1]`; the consumer scales them to its own
/// screen resolution. `last_updated` is seconds since the Unix epoch at the
/// time of the last report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    pub click_pending: bool,
    pub last_updated: f64,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            click_pending: false,
            last_updated: 0.0,
        }
    }
}

/// The shared relay state, safe for concurrent reports and consumes.
///
/// Both operations take the same lock, so a report can never interleave with
/// a consume in a way that loses a sticky click, and x/y updates are
/// last-writer-wins as a whole pair.
#[derive(Debug, Default)]
pub struct CursorRelay {
    state: Mutex<CursorState>,
}

impl CursorRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a report from the capture side.
    ///
    /// Present coordinates overwrite the stored ones (last writer wins);
    /// absent coordinates leave the prior values. `click = true` sets the
    /// pending flag; `click = false` leaves it untouched — the flag is only
    /// ever cleared by [`consume`](Self::consume).
    pub fn report(&self, x: Option<f64>, y: Option<f64>, click: bool, now_secs: f64) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(x) = x {
            state.x = x.clamp(0.0, 1.0);
        }
        if let Some(y) = y {
            state.y = y.clamp(0.0, 1.0);
        }
        if click {
            state.click_pending = true;
        }
        state.last_updated = now_secs;
    }

    /// Report stamped with the current wall-clock time.
    pub fn report_now(&self, x: Option<f64>, y: Option<f64>, click: bool) {
        self.report(x, y, click, epoch_secs_now());
    }

    /// Returns the current snapshot and resets the pending click as part of
    /// the same call.
    ///
    /// The returned snapshot carries the flag's value *before* the reset, so
    /// the one poll that observes `click_pending = true` is the one that
    /// consumed it.
    pub fn consume(&self) -> CursorState {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = *state;
        state.click_pending = false;
        snapshot
    }

    /// Reads the current state without consuming the click (diagnostics).
    pub fn peek(&self) -> CursorState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Seconds since the Unix epoch, as carried in `last_updated`.
pub fn epoch_secs_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
