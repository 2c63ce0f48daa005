//! ReplayCursorUseCase: polled relay snapshots → local pointer input.
//!
//! Each snapshot carries normalized coordinates; this use case scales them to
//! the receiver's own screen (the relay deliberately never carries the
//! producer's resolution) and dispatches through the serialized
//! [`InputDispatcher`].
//!
//! Identical consecutive positions are filtered out so a 20 Hz poll against
//! an idle producer does not inject a stream of redundant moves. The filter
//! never suppresses clicks.

use std::sync::Arc;

use palmlink_core::domain::geometry::{norm_to_screen, NormalizedPoint, ScreenSize};
use palmlink_core::protocol::CursorSnapshot;
use palmlink_core::{GestureEvent, InputDispatcher, Mode};

/// Filters duplicate consecutive positions to avoid injecting the same move
/// twice.
#[derive(Default)]
struct DedupFilter {
    last_pos: Option<(i32, i32)>,
}

impl DedupFilter {
    fn should_send(&mut self, x: i32, y: i32) -> bool {
        if self.last_pos == Some((x, y)) {
            return false;
        }
        self.last_pos = Some((x, y));
        true
    }

    fn reset(&mut self) {
        self.last_pos = None;
    }
}

/// The replay use case.
pub struct ReplayCursorUseCase {
    dispatcher: Arc<InputDispatcher>,
    screen: ScreenSize,
    dedup: DedupFilter,
}

impl ReplayCursorUseCase {
    pub fn new(dispatcher: Arc<InputDispatcher>, screen: ScreenSize) -> Self {
        Self {
            dispatcher,
            screen,
            dedup: DedupFilter::default(),
        }
    }

    /// Applies one polled snapshot: a move (unless the position is unchanged)
    /// followed by a click when the snapshot carries one.
    pub fn apply(&mut self, snapshot: &CursorSnapshot) {
        let point = norm_to_screen(NormalizedPoint::new(snapshot.x, snapshot.y), self.screen);

        if self.dedup.should_send(point.x, point.y) {
            self.dispatcher.dispatch(&GestureEvent::Move { point }, Mode::Mouse);
        }
        if snapshot.click {
            self.dispatcher.dispatch(&GestureEvent::Click { point }, Mode::Mouse);
        }
    }

    /// Clears the duplicate filter (e.g. after a reconnect, when the local
    /// cursor may have been moved by hand).
    pub fn reset(&mut self) {
        self.dedup.reset();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
