//! Per-frame, per-hand gesture classification.
//!
//! The classifier is the single place where raw fingertip positions become
//! logical gesture events. Gestures are mode- and hand-scoped so the two
//! hands can drive independent concerns at the same time: the left hand owns
//! the pointer, the right hand owns the virtual keyboard.

use std::time::Instant;

use crate::domain::debounce::Debouncer;
use crate::domain::geometry::{FrameSize, Point};
use crate::domain::hand::{pinch_fires, Fingertip, FingertipSet, Handedness};
use crate::domain::keyboard::KeyboardLayout;
use crate::domain::mode::Mode;

/// A logical input gesture, produced and consumed within one dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEvent {
    /// Pointer moves to `point` (frame-pixel space).
    Move { point: Point },
    /// Pointer click at `point`.
    Click { point: Point },
    /// Virtual key tap on the region labelled `label`.
    KeyPress { label: &'static str, point: Point },
}

/// Turns one hand's fingertip set into zero or more gesture events.
///
/// Owns the keyboard layout and the per-key debouncer — both single-writer
/// state touched only by the frame loop, so neither needs a lock.
pub struct GestureClassifier {
    layout: KeyboardLayout,
    debouncer: Debouncer,
}

impl GestureClassifier {
    pub fn new(frame: FrameSize) -> Self {
        Self {
            layout: KeyboardLayout::new(frame),
            debouncer: Debouncer::new(),
        }
    }

    /// The current keyboard layout (for overlay rendering).
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Recomputes the key regions when the frame dimensions change.
    ///
    /// A no-op for an unchanged size, so it is safe to call once per frame.
    pub fn set_frame(&mut self, frame: FrameSize) {
        if self.layout.frame() != frame {
            self.layout = KeyboardLayout::new(frame);
        }
    }

    /// Classifies one hand's fingertips under the given mode.
    ///
    /// - `mouse` + left hand: always emits `Move` at the index fingertip,
    ///   followed by `Click` at the same point when the pinch fires. A held
    ///   pinch therefore clicks on every frame — there is deliberately no
    ///   click debouncing here (only key presses are debounced).
    /// - `keyboard` + right hand: every fingertip is hit-tested against the
    ///   key regions in layout order; each independently matching fingertip
    ///   yields a `KeyPress` if the debouncer accepts its label at `now`.
    /// - Any other mode/hand combination yields nothing.
    ///
    /// Events for one hand are returned in dispatch order: `Move` precedes
    /// `Click`.
    pub fn classify(&mut self, set: &FingertipSet, mode: Mode, now: Instant) -> Vec<GestureEvent> {
        match (mode, set.handedness()) {
            (Mode::Mouse, Handedness::Left) => self.classify_pointer(set),
            (Mode::Keyboard, Handedness::Right) => self.classify_keys(set, now),
            _ => Vec::new(),
        }
    }

    fn classify_pointer(&self, set: &FingertipSet) -> Vec<GestureEvent> {
        let index = set.point(Fingertip::Index);
        let mut events = vec![GestureEvent::Move { point: index }];
        if pinch_fires(set) {
            events.push(GestureEvent::Click { point: index });
        }
        events
    }

    fn classify_keys(&mut self, set: &FingertipSet, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        for tip in Fingertip::ALL {
            let point = set.point(tip);
            if let Some(region) = self.layout.hit_test(point) {
                if self.debouncer.accept(region.label, now) {
                    events.push(GestureEvent::KeyPress {
                        label: region.label,
                        point,
                    });
                }
            }
        }
        events
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
