//! Serialized dispatch into the OS input-injection surface.
//!
//! The underlying injection APIs are not guaranteed safe under concurrent
//! invocation, and event ordering matters: a `Move` immediately followed by a
//! `Click` must reach the OS in that order even when events are produced by
//! different tasks (the frame loop on the station, the poll loop on the
//! receiver). [`InputDispatcher`] therefore funnels every OS call through one
//! mutual-exclusion critical section.
//!
//! The dispatcher talks to the OS through the [`InputInjector`] port and to
//! the audit log through the [`EventSink`] port, so platform backends and
//! recording test doubles plug in interchangeably.

pub mod mock;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::domain::classifier::GestureEvent;
use crate::domain::mode::Mode;

/// Error type for input injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// A single injection call failed; later calls may still succeed.
    #[error("platform error: {0}")]
    Platform(String),

    /// The injection surface is gone for good (no display, permission
    /// revoked). The dispatcher reacts by disabling injection for the rest of
    /// the session.
    #[error("injection surface unavailable")]
    Unavailable,
}

/// Platform-agnostic input injection port.
///
/// Implementations live in `palmlink-inject`: a recording mock, a headless
/// no-op, and the per-OS backends.
pub trait InputInjector: Send + Sync {
    /// Moves the pointer to an absolute position in screen pixels.
    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Presses and releases the primary pointer button at the current
    /// position.
    fn click(&self) -> Result<(), InjectionError>;

    /// Taps the named key. `key` is a lowercase key name (e.g. `"q"`).
    fn press_key(&self, key: &str) -> Result<(), InjectionError>;
}

/// Append-only audit sink for dispatched gestures.
///
/// Writes are fire-and-forget: implementations must never block the caller
/// and must swallow (and log) their own failures.
pub trait EventSink: Send + Sync {
    fn record(&self, record: DispatchRecord);
}

/// Sink for deployments that keep no audit log: every record is dropped.
#[derive(Debug, Default)]
pub struct DiscardSink;

impl EventSink for DiscardSink {
    fn record(&self, _record: DispatchRecord) {}
}

/// One audit entry, written for every accepted `Click` or `KeyPress`
/// (never for `Move`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Session this event belongs to, stamped once at startup.
    pub session_id: Uuid,
    /// Key label for a key press; `None` for a click.
    pub text: Option<String>,
    /// Pointer x in frame pixels, when the gesture carries a position.
    pub x: Option<i32>,
    /// Pointer y in frame pixels.
    pub y: Option<i32>,
    /// Mode the session was in when the gesture was accepted.
    pub mode: Mode,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// The single serialized entry point into the OS input surface.
pub struct InputDispatcher {
    injector: Arc<dyn InputInjector>,
    sink: Arc<dyn EventSink>,
    session_id: Uuid,
    /// Critical section around every injector call.
    gate: Mutex<()>,
    /// Set when the injector reported [`InjectionError::Unavailable`];
    /// injection becomes a no-op for the rest of the session.
    injection_disabled: AtomicBool,
}

impl InputDispatcher {
    pub fn new(injector: Arc<dyn InputInjector>, sink: Arc<dyn EventSink>, session_id: Uuid) -> Self {
        Self {
            injector,
            sink,
            session_id,
            gate: Mutex::new(()),
            injection_disabled: AtomicBool::new(false),
        }
    }

    /// `true` once the injection surface has been declared gone for this
    /// session.
    pub fn injection_disabled(&self) -> bool {
        self.injection_disabled.load(Ordering::Relaxed)
    }

    /// Dispatches one gesture event.
    ///
    /// The OS call happens inside the critical section, preserving both
    /// exclusivity and submission order across callers. Injection failures
    /// are caught here: they are logged and never propagated, so one failed
    /// action cannot abort the frame loop or leave the gate held.
    ///
    /// Clicks and key presses are recorded to the sink whether or not the
    /// injection itself succeeded — in headless deployments the sink and the
    /// relay are the only outputs.
    pub fn dispatch(&self, event: &GestureEvent, mode: Mode) {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());

        if !self.injection_disabled.load(Ordering::Relaxed) {
            if let Err(e) = self.inject(event) {
                match e {
                    InjectionError::Unavailable => {
                        warn!("injection surface unavailable; disabling injection for this session");
                        self.injection_disabled.store(true, Ordering::Relaxed);
                    }
                    other => warn!("injection failed: {other}"),
                }
            }
        }

        if let Some(record) = self.to_record(event, mode) {
            self.sink.record(record);
        }
    }

    fn inject(&self, event: &GestureEvent) -> Result<(), InjectionError> {
        match event {
            GestureEvent::Move { point } => self.injector.move_to(point.x, point.y),
            GestureEvent::Click { .. } => self.injector.click(),
            // The OS key name is lowercase; the region label stays uppercase.
            GestureEvent::KeyPress { label, .. } => {
                self.injector.press_key(&label.to_ascii_lowercase())
            }
        }
    }

    fn to_record(&self, event: &GestureEvent, mode: Mode) -> Option<DispatchRecord> {
        match event {
            GestureEvent::Move { .. } => None,
            GestureEvent::Click { point } => Some(DispatchRecord {
                session_id: self.session_id,
                text: None,
                x: Some(point.x),
                y: Some(point.y),
                mode,
                timestamp_ms: epoch_millis_now(),
            }),
            GestureEvent::KeyPress { label, point } => Some(DispatchRecord {
                session_id: self.session_id,
                text: Some((*label).to_string()),
                x: Some(point.x),
                y: Some(point.y),
                mode,
                timestamp_ms: epoch_millis_now(),
            }),
        }
    }
}

fn epoch_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::{InjectedOp, RecordingInjector, RecordingSink};
    use super::*;
    use crate::domain::geometry::Point;

    fn make_dispatcher(
        injector: Arc<RecordingInjector>,
        sink: Arc<RecordingSink>,
    ) -> InputDispatcher {
        InputDispatcher::new(injector, sink, Uuid::new_v4())
    }

    #[test]
    fn test_move_then_click_reach_injector_in_order() {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(Arc::clone(&injector), sink);

        dispatcher.dispatch(&GestureEvent::Move { point: Point::new(10, 20) }, Mode::Mouse);
        dispatcher.dispatch(&GestureEvent::Click { point: Point::new(10, 20) }, Mode::Mouse);

        let ops = injector.ops.lock().unwrap();
        assert_eq!(*ops, vec![InjectedOp::MoveTo(10, 20), InjectedOp::Click]);
    }

    #[test]
    fn test_move_is_not_recorded_to_the_sink() {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(injector, Arc::clone(&sink));

        dispatcher.dispatch(&GestureEvent::Move { point: Point::new(1, 2) }, Mode::Mouse);

        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_click_is_recorded_with_position_and_no_text() {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(injector, Arc::clone(&sink));

        dispatcher.dispatch(&GestureEvent::Click { point: Point::new(7, 9) }, Mode::Mouse);

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, None);
        assert_eq!((records[0].x, records[0].y), (Some(7), Some(9)));
        assert_eq!(records[0].mode, Mode::Mouse);
    }

    #[test]
    fn test_key_press_injects_lowercase_but_records_the_label() {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(Arc::clone(&injector), Arc::clone(&sink));

        dispatcher.dispatch(
            &GestureEvent::KeyPress { label: "Q", point: Point::new(50, 460) },
            Mode::Keyboard,
        );

        let ops = injector.ops.lock().unwrap();
        assert_eq!(*ops, vec![InjectedOp::KeyPress("q".to_string())]);
        let records = sink.records.lock().unwrap();
        assert_eq!(records[0].text.as_deref(), Some("Q"));
    }

    #[test]
    fn test_injection_failure_is_swallowed_and_later_calls_proceed() {
        let injector = Arc::new(RecordingInjector::failing());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(Arc::clone(&injector), sink);

        // Must not panic and must not poison the gate.
        dispatcher.dispatch(&GestureEvent::Move { point: Point::new(1, 1) }, Mode::Mouse);
        dispatcher.dispatch(&GestureEvent::Move { point: Point::new(2, 2) }, Mode::Mouse);

        assert!(!dispatcher.injection_disabled(), "transient failures do not disable");
    }

    #[test]
    fn test_unavailable_surface_disables_injection_for_the_session() {
        let injector = Arc::new(RecordingInjector::unavailable());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = make_dispatcher(Arc::clone(&injector), Arc::clone(&sink));

        dispatcher.dispatch(&GestureEvent::Click { point: Point::new(1, 1) }, Mode::Mouse);
        assert!(dispatcher.injection_disabled());

        // Further events skip the injector entirely...
        dispatcher.dispatch(&GestureEvent::Click { point: Point::new(2, 2) }, Mode::Mouse);
        assert_eq!(injector.attempts(), 1, "no injector call after disable");

        // ...but are still recorded for the audit trail.
        assert_eq!(sink.records.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_records_carry_the_session_id() {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let session_id = Uuid::new_v4();
        let dispatcher = InputDispatcher::new(injector, sink.clone(), session_id);

        dispatcher.dispatch(&GestureEvent::Click { point: Point::new(0, 0) }, Mode::Mouse);

        assert_eq!(sink.records.lock().unwrap()[0].session_id, session_id);
    }
}
