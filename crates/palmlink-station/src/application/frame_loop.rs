//! The continuous frame-processing loop.
//!
//! One loop per session, one frame in flight at a time. Each iteration:
//!
//! 1. Checks the shutdown flag (a stop takes effect at the frame boundary).
//! 2. Acquires the next frame, backing off briefly when none is available.
//! 3. Skips placeholder frames (degraded capture) without touching the
//!    pipeline.
//! 4. Runs the detector; a detector error skips classification for this
//!    frame only.
//! 5. Hands the detected hands to [`ProcessFrameUseCase`].
//!
//! The loop never blocks on network or disk I/O: relay updates are in-memory
//! and event-sink writes are queued off the critical path. After the loop
//! exits the capture device is released exactly once; no injection call can
//! happen after that point because dispatch only occurs inside the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::application::process_frame::ProcessFrameUseCase;
use crate::application::session::SessionContext;
use crate::infrastructure::capture::FrameSource;
use crate::infrastructure::detector::HandDetector;

/// Runs the capture → detect → process loop until shutdown is requested.
pub async fn run_frame_loop(
    mut use_case: ProcessFrameUseCase,
    capture: Arc<dyn FrameSource>,
    detector: Arc<dyn HandDetector>,
    ctx: Arc<SessionContext>,
    idle_backoff: Duration,
) {
    info!("frame loop started");
    let mut capture_warned = false;

    while ctx.is_running() {
        let frame = match capture.next_frame().await {
            Ok(frame) => {
                capture_warned = false;
                frame
            }
            Err(e) => {
                // Log the first failure at warn, repeats at debug, and back
                // off so a dead device does not spin the loop.
                if capture_warned {
                    debug!("frame acquisition failed: {e}");
                } else {
                    warn!("frame acquisition failed: {e}; backing off");
                    capture_warned = true;
                }
                tokio::time::sleep(idle_backoff).await;
                continue;
            }
        };

        if frame.placeholder {
            // Degraded capture: nothing to classify, nothing to dispatch.
            continue;
        }

        let hands = match detector.detect(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                debug!("detector error, skipping frame: {e}");
                continue;
            }
        };

        use_case.process(frame.size, &hands, Instant::now());
    }

    capture.release().await;
    info!("frame loop stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use palmlink_core::dispatch::mock::{InjectedOp, RecordingInjector, RecordingSink};
    use palmlink_core::{FingertipSet, FrameSize, Handedness, InputDispatcher, Point};

    use crate::infrastructure::capture::{CaptureError, Frame};
    use crate::infrastructure::detector::{NullDetector, ScriptedDetector};

    const FRAME_SIZE: FrameSize = FrameSize { width: 1280, height: 720 };

    /// Replays a fixed list of frames, then requests shutdown so the loop
    /// terminates deterministically.
    struct ScriptedSource {
        frames: Mutex<VecDeque<Result<Frame, CaptureError>>>,
        ctx: Arc<SessionContext>,
        released: AtomicBool,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Result<Frame, CaptureError>>, ctx: Arc<SessionContext>) -> Self {
            Self {
                frames: Mutex::new(frames.into()),
                ctx,
                released: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl FrameSource for ScriptedSource {
        async fn next_frame(&self) -> Result<Frame, CaptureError> {
            let next = self.frames.lock().unwrap().pop_front();
            match next {
                Some(result) => result,
                None => {
                    self.ctx.request_shutdown();
                    Err(CaptureError::Unavailable("script exhausted".to_string()))
                }
            }
        }

        async fn release(&self) {
            self.released.store(true, Ordering::Relaxed);
        }
    }

    fn live_frame() -> Result<Frame, CaptureError> {
        Ok(Frame { size: FRAME_SIZE, placeholder: false })
    }

    fn placeholder_frame() -> Result<Frame, CaptureError> {
        Ok(Frame { size: FRAME_SIZE, placeholder: true })
    }

    fn pinched_left() -> FingertipSet {
        FingertipSet::new(
            Handedness::Left,
            [
                Point::new(100, 100),
                Point::new(640, 360),
                Point::new(300, 100),
                Point::new(320, 100),
                Point::new(110, 100),
            ],
        )
    }

    fn harness(
        ctx: &Arc<SessionContext>,
    ) -> (ProcessFrameUseCase, Arc<RecordingInjector>) {
        let injector = Arc::new(RecordingInjector::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(InputDispatcher::new(
            Arc::clone(&injector) as _,
            sink,
            ctx.session_id,
        ));
        let use_case = ProcessFrameUseCase::new(FRAME_SIZE, dispatcher, Arc::clone(ctx));
        (use_case, injector)
    }

    #[tokio::test]
    async fn test_loop_processes_frames_and_stops_on_shutdown() {
        let ctx = Arc::new(SessionContext::new());
        let (use_case, injector) = harness(&ctx);
        let source = Arc::new(ScriptedSource::new(
            vec![live_frame(), live_frame()],
            Arc::clone(&ctx),
        ));
        let detector = Arc::new(ScriptedDetector::new(vec![vec![pinched_left()], vec![]]));

        run_frame_loop(
            use_case,
            Arc::clone(&source) as _,
            detector,
            Arc::clone(&ctx),
            Duration::from_millis(1),
        )
        .await;

        // Frame 1 carried a pinched hand: move + click were injected.
        let ops = injector.ops.lock().unwrap();
        assert_eq!(*ops, vec![InjectedOp::MoveTo(640, 360), InjectedOp::Click]);
        assert!(!ctx.is_running());
    }

    #[tokio::test]
    async fn test_capture_release_happens_exactly_once_at_exit() {
        let ctx = Arc::new(SessionContext::new());
        let (use_case, _) = harness(&ctx);
        let source = Arc::new(ScriptedSource::new(vec![], Arc::clone(&ctx)));

        run_frame_loop(
            use_case,
            Arc::clone(&source) as _,
            Arc::new(NullDetector),
            Arc::clone(&ctx),
            Duration::from_millis(1),
        )
        .await;

        assert!(source.released.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_placeholder_frames_never_reach_the_detector() {
        let ctx = Arc::new(SessionContext::new());
        let (use_case, injector) = harness(&ctx);
        let source = Arc::new(ScriptedSource::new(
            vec![placeholder_frame(), placeholder_frame()],
            Arc::clone(&ctx),
        ));
        // A failing detector would error on any call; the loop must never
        // call it for placeholder frames.
        let detector = Arc::new(ScriptedDetector::new(vec![vec![pinched_left()]]));

        run_frame_loop(
            use_case,
            source,
            detector,
            Arc::clone(&ctx),
            Duration::from_millis(1),
        )
        .await;

        assert!(injector.ops.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detector_error_skips_the_frame_but_not_the_loop() {
        let ctx = Arc::new(SessionContext::new());
        let (use_case, injector) = harness(&ctx);
        let source = Arc::new(ScriptedSource::new(
            vec![live_frame(), live_frame()],
            Arc::clone(&ctx),
        ));
        let detector = Arc::new(ScriptedDetector::failing());

        run_frame_loop(
            use_case,
            source,
            detector,
            Arc::clone(&ctx),
            Duration::from_millis(1),
        )
        .await;

        // Both frames were skipped; the loop still ran to completion.
        assert!(injector.ops.lock().unwrap().is_empty());
        assert!(!ctx.is_running());
    }

    #[tokio::test]
    async fn test_capture_errors_back_off_and_continue() {
        let ctx = Arc::new(SessionContext::new());
        let (use_case, injector) = harness(&ctx);
        let source = Arc::new(ScriptedSource::new(
            vec![
                Err(CaptureError::Unavailable("gone".to_string())),
                live_frame(),
            ],
            Arc::clone(&ctx),
        ));
        let detector = Arc::new(ScriptedDetector::new(vec![vec![pinched_left()]]));

        run_frame_loop(
            use_case,
            source,
            detector,
            Arc::clone(&ctx),
            Duration::from_millis(1),
        )
        .await;

        // The frame after the failure was still processed.
        assert_eq!(injector.ops.lock().unwrap().len(), 2);
    }
}
