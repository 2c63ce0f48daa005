//! Frame acquisition port.
//!
//! Video capture itself is an external concern — this module defines the
//! boundary the frame loop consumes and the degraded implementation used when
//! no camera backend is present.
//!
//! A real backend (V4L2, AVFoundation, …) blocks until the next frame is
//! available. The shipped [`PlaceholderSource`] instead emits placeholder
//! frames at a fixed cadence: the frame loop skips gesture processing for
//! placeholder frames, so the service keeps serving the relay and the mode
//! endpoint with no camera attached.

use std::time::Duration;

use async_trait::async_trait;
use palmlink_core::FrameSize;
use thiserror::Error;

/// Error type for frame acquisition.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The device disappeared or could not produce a frame.
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
}

/// One acquired video frame.
///
/// The pixel payload never enters the core pipeline (the detector consumes it
/// opaquely), so only the dimensions and the degraded-mode marker travel
/// through the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub size: FrameSize,
    /// `true` when this frame was synthesized because no capture device is
    /// present. Placeholder frames never reach the gesture pipeline.
    pub placeholder: bool,
}

/// Port for acquiring frames, one at a time.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Waits for and returns the next frame.
    async fn next_frame(&self) -> Result<Frame, CaptureError>;

    /// Releases the underlying device. Called exactly once at shutdown.
    async fn release(&self);
}

/// Frame source used when the session has no capture device.
pub struct PlaceholderSource {
    size: FrameSize,
    interval: Duration,
}

impl PlaceholderSource {
    /// Emits placeholder frames of `size` every `interval`.
    pub fn new(size: FrameSize, interval: Duration) -> Self {
        Self { size, interval }
    }
}

#[async_trait]
impl FrameSource for PlaceholderSource {
    async fn next_frame(&self) -> Result<Frame, CaptureError> {
        // Pace the loop the way a real camera would; without this the frame
        // loop would spin.
        tokio::time::sleep(self.interval).await;
        Ok(Frame {
            size: self.size,
            placeholder: true,
        })
    }

    async fn release(&self) {}
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_source_marks_frames_as_placeholder() {
        let source = PlaceholderSource::new(FrameSize::new(1280, 720), Duration::from_millis(1));
        let frame = source.next_frame().await.unwrap();
        assert!(frame.placeholder);
        assert_eq!(frame.size, FrameSize::new(1280, 720));
    }

    #[tokio::test]
    async fn test_placeholder_source_paces_frames() {
        let source = PlaceholderSource::new(FrameSize::default(), Duration::from_millis(20));
        let start = std::time::Instant::now();
        source.next_frame().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
