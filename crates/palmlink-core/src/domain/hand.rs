//! Fingertip identities, per-hand landmark sets, and the pinch classifier.
//!
//! The landmark detector reports 21 landmarks per hand; the pipeline only
//! consumes the five fingertip landmarks. A [`FingertipSet`] is produced once
//! per detected hand per frame, owned by the classification pass that created
//! it, and discarded when the frame is done — it is never retained across
//! frames.

use serde::{Deserialize, Serialize};

use crate::domain::geometry::{norm_to_frame, FrameSize, NormalizedPoint, Point};

/// Pixel threshold below which the thumb-to-pinky distance counts as a pinch.
///
/// Tuned at the detector's native 1280×720 coordinate scale. The comparison is
/// strict: exactly 40.0 px does NOT fire.
pub const PINCH_THRESHOLD_PX: f64 = 40.0;

/// Which hand a landmark set belongs to, as labelled by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

/// The five tracked fingertip identities.
///
/// The discriminants match the detector's landmark indices for fingertips
/// (4, 8, 12, 16, 20), which is also the fixed iteration order used for
/// keyboard hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fingertip {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Fingertip {
    /// All fingertips in their fixed pipeline order.
    pub const ALL: [Fingertip; 5] = [
        Fingertip::Thumb,
        Fingertip::Index,
        Fingertip::Middle,
        Fingertip::Ring,
        Fingertip::Pinky,
    ];

    /// The detector's landmark index for this fingertip.
    pub fn landmark_index(self) -> usize {
        match self {
            Fingertip::Thumb => 4,
            Fingertip::Index => 8,
            Fingertip::Middle => 12,
            Fingertip::Ring => 16,
            Fingertip::Pinky => 20,
        }
    }

    fn slot(self) -> usize {
        match self {
            Fingertip::Thumb => 0,
            Fingertip::Index => 1,
            Fingertip::Middle => 2,
            Fingertip::Ring => 3,
            Fingertip::Pinky => 4,
        }
    }
}

/// One hand's five fingertip positions in frame-pixel space, plus which hand
/// it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingertipSet {
    points: [Point; 5],
    handedness: Handedness,
}

impl FingertipSet {
    /// Builds a set from fingertip points already in frame-pixel space,
    /// ordered thumb → pinky.
    pub fn new(handedness: Handedness, points: [Point; 5]) -> Self {
        Self { points, handedness }
    }

    /// Builds a set from the detector's normalized fingertip coordinates,
    /// ordered thumb → pinky, mapping them into frame-pixel space.
    pub fn from_normalized(
        handedness: Handedness,
        normalized: [NormalizedPoint; 5],
        frame: FrameSize,
    ) -> Self {
        let mut points = [Point::new(0, 0); 5];
        for (slot, n) in normalized.iter().enumerate() {
            points[slot] = norm_to_frame(*n, frame);
        }
        Self { points, handedness }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Position of one fingertip in frame-pixel space.
    pub fn point(&self, tip: Fingertip) -> Point {
        self.points[tip.slot()]
    }
}

/// Returns `true` when the set forms the click gesture: thumb-to-pinky
/// distance strictly below [`PINCH_THRESHOLD_PX`].
///
/// This is a coarse full-hand pinch (thumb and pinky are the detector's two
/// reference points), not a precise thumb-index pinch. There is no hysteresis:
/// the condition is re-evaluated per frame, so a held pinch fires on every
/// frame. Keep it that way — callers that need once-per-hold semantics must
/// not get them from here.
pub fn pinch_fires(set: &FingertipSet) -> bool {
    set.point(Fingertip::Thumb)
        .distance(&set.point(Fingertip::Pinky))
        < PINCH_THRESHOLD_PX
}

// ── Tests ─────────────────────────────────────────────────────────────────────
