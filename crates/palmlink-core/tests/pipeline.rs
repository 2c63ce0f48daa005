//! Integration tests for the gesture pipeline: classification, dispatch, and
//! relay working together the way the station's frame loop drives them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use palmlink_core::dispatch::mock::{InjectedOp, RecordingInjector, RecordingSink};
use palmlink_core::domain::geometry::frame_to_norm;
use palmlink_core::protocol::CursorSnapshot;
use palmlink_core::{
    CursorRelay, FingertipSet, FrameSize, GestureClassifier, GestureEvent, Handedness,
    InputDispatcher, Mode, ModeController, Point,
};
use uuid::Uuid;

const FRAME: FrameSize = FrameSize { width: 1280, height: 720 };

/// A pinched left hand (thumb and pinky 10 px apart) with the index at `p`.
fn pinched_left(p: Point) -> FingertipSet {
    FingertipSet::new(
        Handedness::Left,
        [
            Point::new(100, 100),
            p,
            Point::new(300, 100),
            Point::new(320, 100),
            Point::new(110, 100),
        ],
    )
}

/// A right hand with only the index fingertip on the "Q" key.
fn right_on_q(classifier: &GestureClassifier) -> FingertipSet {
    let q = classifier
        .layout()
        .regions()
        .iter()
        .find(|r| r.label == "Q")
        .expect("Q exists");
    let on_q = Point::new(q.x + q.width / 2, q.y + q.height / 2);
    let off = Point::new(5, 5);
    FingertipSet::new(Handedness::Right, [off, on_q, off, off, off])
}

/// Runs one simulated frame: classify each hand and dispatch the results.
fn run_frame(
    classifier: &mut GestureClassifier,
    dispatcher: &InputDispatcher,
    mode: Mode,
    hands: &[FingertipSet],
    now: Instant,
) {
    for hand in hands {
        for event in classifier.classify(hand, mode, now) {
            dispatcher.dispatch(&event, mode);
        }
    }
}

#[test]
fn test_pinched_frame_injects_move_before_click() {
    let injector = Arc::new(RecordingInjector::new());
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = InputDispatcher::new(injector.clone(), sink, Uuid::new_v4());
    let mut classifier = GestureClassifier::new(FRAME);

    run_frame(
        &mut classifier,
        &dispatcher,
        Mode::Mouse,
        &[pinched_left(Point::new(400, 300))],
        Instant::now(),
    );

    let ops = injector.ops.lock().unwrap();
    assert_eq!(*ops, vec![InjectedOp::MoveTo(400, 300), InjectedOp::Click]);
}

#[test]
fn test_mouse_mode_never_produces_key_presses() {
    let injector = Arc::new(RecordingInjector::new());
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = InputDispatcher::new(injector.clone(), sink, Uuid::new_v4());
    let mut classifier = GestureClassifier::new(FRAME);

    // Right hand planted on the keyboard, but the session is in mouse mode.
    let right = right_on_q(&classifier);
    run_frame(&mut classifier, &dispatcher, Mode::Mouse, &[right], Instant::now());

    assert!(injector.ops.lock().unwrap().is_empty());
}

#[test]
fn test_keyboard_mode_never_produces_pointer_events() {
    let injector = Arc::new(RecordingInjector::new());
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = InputDispatcher::new(injector.clone(), sink, Uuid::new_v4());
    let mut classifier = GestureClassifier::new(FRAME);

    run_frame(
        &mut classifier,
        &dispatcher,
        Mode::Keyboard,
        &[pinched_left(Point::new(400, 300))],
        Instant::now(),
    );

    assert!(injector.ops.lock().unwrap().is_empty());
}

#[test]
fn test_held_key_fires_once_per_debounce_window_across_frames() {
    let injector = Arc::new(RecordingInjector::new());
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = InputDispatcher::new(injector.clone(), sink, Uuid::new_v4());
    let mut classifier = GestureClassifier::new(FRAME);
    let right = right_on_q(&classifier);

    // ~30 fps for half a second: 15 frames, one 300 ms window boundary inside.
    let t0 = Instant::now();
    for i in 0..15 {
        let now = t0 + Duration::from_millis(i * 33);
        run_frame(&mut classifier, &dispatcher, Mode::Keyboard, &[right.clone()], now);
    }

    let ops = injector.ops.lock().unwrap();
    // Accepted at t=0 and at the first frame past 300 ms (t=330), nothing else.
    assert_eq!(
        *ops,
        vec![
            InjectedOp::KeyPress("q".to_string()),
            InjectedOp::KeyPress("q".to_string()),
        ]
    );
}

#[test]
fn test_mode_switch_applies_to_the_following_frame() {
    let injector = Arc::new(RecordingInjector::new());
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = InputDispatcher::new(injector.clone(), sink, Uuid::new_v4());
    let mut classifier = GestureClassifier::new(FRAME);
    let mode_ctl = ModeController::default();
    let right = right_on_q(&classifier);

    // Frame 1: mode read at frame start is mouse; a switch arrives "mid-frame".
    let frame_mode = mode_ctl.get();
    mode_ctl.set(Mode::Keyboard);
    run_frame(&mut classifier, &dispatcher, frame_mode, &[right.clone()], Instant::now());
    assert!(injector.ops.lock().unwrap().is_empty(), "in-flight frame keeps its mode");

    // Frame 2: the new mode is picked up at the next frame boundary.
    let frame_mode = mode_ctl.get();
    run_frame(
        &mut classifier,
        &dispatcher,
        frame_mode,
        &[right],
        Instant::now() + Duration::from_millis(400),
    );
    assert_eq!(injector.ops.lock().unwrap().len(), 1);
}

#[test]
fn test_frame_events_feed_the_relay_and_survive_to_one_consumer_poll() {
    // The station side: classify a pinched frame and publish it to the relay.
    let mut classifier = GestureClassifier::new(FRAME);
    let relay = CursorRelay::new();

    let events = classifier.classify(
        &pinched_left(Point::new(640, 360)),
        Mode::Mouse,
        Instant::now(),
    );
    for event in &events {
        match event {
            GestureEvent::Move { point } => {
                let n = frame_to_norm(*point, FRAME);
                relay.report(Some(n.x), Some(n.y), false, 1.0);
            }
            GestureEvent::Click { .. } => relay.report(None, None, true, 1.0),
            GestureEvent::KeyPress { .. } => {}
        }
    }

    // The receiver side: one poll gets the click, the next does not.
    let snapshot = CursorSnapshot::from(relay.consume());
    assert_eq!((snapshot.x, snapshot.y), (0.5, 0.5));
    assert!(snapshot.click);

    let second = CursorSnapshot::from(relay.consume());
    assert!(!second.click);
}
