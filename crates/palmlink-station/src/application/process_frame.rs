//! ProcessFrameUseCase: one frame's detected hands → dispatched input.
//!
//! For every hand the detector reported, the classifier produces gesture
//! events under the mode read once at frame start. Each event then fans out:
//!
//! - to the [`InputDispatcher`] (local OS injection + event-sink audit), and
//! - to the session's shared state: pointer events feed the cursor relay in
//!   normalized coordinates, key presses feed the typed-text buffer.
//!
//! Events for a single hand are dispatched in classification order, which
//! guarantees `Move` reaches the OS before the `Click` of the same frame.

use std::sync::Arc;
use std::time::Instant;

use palmlink_core::domain::geometry::frame_to_norm;
use palmlink_core::{FingertipSet, FrameSize, GestureClassifier, GestureEvent, InputDispatcher};

use crate::application::session::SessionContext;

/// Per-frame orchestration of classification and dispatch.
pub struct ProcessFrameUseCase {
    classifier: GestureClassifier,
    dispatcher: Arc<InputDispatcher>,
    ctx: Arc<SessionContext>,
}

impl ProcessFrameUseCase {
    pub fn new(
        frame: FrameSize,
        dispatcher: Arc<InputDispatcher>,
        ctx: Arc<SessionContext>,
    ) -> Self {
        Self {
            classifier: GestureClassifier::new(frame),
            dispatcher,
            ctx,
        }
    }

    /// Processes one frame's worth of detected hands.
    ///
    /// The mode is read exactly once here, so a switch request arriving while
    /// this frame is in flight only affects the next frame.
    pub fn process(&mut self, frame: FrameSize, hands: &[FingertipSet], now: Instant) {
        self.classifier.set_frame(frame);
        let mode = self.ctx.mode.get();

        for hand in hands {
            for event in self.classifier.classify(hand, mode, now) {
                self.publish(&event, frame);
                self.dispatcher.dispatch(&event, mode);
            }
        }
    }

    /// Mirrors an event into the session's shared state.
    fn publish(&self, event: &GestureEvent, frame: FrameSize) {
        match event {
            GestureEvent::Move { point } => {
                let n = frame_to_norm(*point, frame);
                self.ctx.relay.report_now(Some(n.x), Some(n.y), false);
            }
            GestureEvent::Click { .. } => {
                self.ctx.relay.report_now(None, None, true);
            }
            GestureEvent::KeyPress { label, .. } => {
                self.ctx.text.push_label(label);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
