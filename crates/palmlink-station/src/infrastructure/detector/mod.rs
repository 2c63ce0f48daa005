//! Hand-landmark detector boundary.
//!
//! The detector is an opaque ML oracle: given a frame it returns zero or more
//! per-hand fingertip sets with a handedness label. Palmlink does not
//! reimplement it — this module defines the port the frame loop consumes, a
//! null implementation for deployments without a detector runtime, and a
//! scripted implementation for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use palmlink_core::FingertipSet;
use thiserror::Error;

use crate::infrastructure::capture::Frame;

/// Error type for detector invocations.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The detector runtime is not loaded in this deployment.
    #[error("no detector runtime available")]
    Unavailable,

    /// The detector failed on this frame only; later frames may succeed.
    #[error("detection failed: {0}")]
    Failed(String),
}

/// Port for per-frame hand detection.
pub trait HandDetector: Send + Sync {
    /// Detects hands in `frame`. An empty vector is a normal result (no
    /// hands in view), distinct from an error.
    fn detect(&self, frame: &Frame) -> Result<Vec<FingertipSet>, DetectorError>;
}

/// Detector used when no runtime is linked: every frame reports no hands.
///
/// The video overlay and the HTTP surface keep working; only gesture
/// production is absent.
#[derive(Debug, Default)]
pub struct NullDetector;

impl HandDetector for NullDetector {
    fn detect(&self, _frame: &Frame) -> Result<Vec<FingertipSet>, DetectorError> {
        Ok(Vec::new())
    }
}

/// Test detector that replays a prepared sequence of per-frame results.
///
/// Each call to [`detect`](HandDetector::detect) pops the next scripted
/// frame; once the script is exhausted every call reports no hands. Set
/// `should_fail` to make every call error instead, for exercising the
/// skip-frame path.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Vec<FingertipSet>>>,
    pub should_fail: bool,
}

impl ScriptedDetector {
    pub fn new(frames: Vec<Vec<FingertipSet>>) -> Self {
        Self {
            script: Mutex::new(frames.into()),
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            should_fail: true,
        }
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&self, _frame: &Frame) -> Result<Vec<FingertipSet>, DetectorError> {
        if self.should_fail {
            return Err(DetectorError::Failed("scripted failure".to_string()));
        }
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
