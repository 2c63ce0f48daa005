//! Virtual keyboard layout and key-region hit testing.
//!
//! The layout is a three-row QWERTY grid of 26 key regions sized to the
//! current frame. It is recomputed only when the frame dimensions change —
//! once per session in practice — never per fingertip.
//!
//! Geometry (at the frame's pixel scale):
//!
//! - key width  = frame_width / 12
//! - key height = 80
//! - horizontal pitch = key width + 5, left margin = 30
//! - vertical pitch   = key height + 5
//! - first row top    = frame_height − 3·key_height − 40

use crate::domain::geometry::{FrameSize, Point};

/// Key labels by row. 10 + 9 + 7 = 26 regions.
pub const KEY_ROWS: [&[&str]; 3] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
];

/// Height of every key region in frame pixels.
const KEY_HEIGHT: i32 = 80;

/// Gap between adjacent keys, both axes.
const KEY_GAP: i32 = 5;

/// Left margin of each row.
const LEFT_MARGIN: i32 = 30;

/// Distance from the bottom frame edge to the bottom of the last row.
const BOTTOM_MARGIN: i32 = 40;

/// One named rectangular key region in frame-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub label: &'static str,
}

impl KeyRegion {
    /// Returns `true` when `p` lies strictly inside the region.
    ///
    /// Points on the region border do not count as contained, so a fingertip
    /// sitting exactly on the gap between two keys matches neither.
    pub fn contains(&self, p: Point) -> bool {
        self.x < p.x && p.x < self.x + self.width && self.y < p.y && p.y < self.y + self.height
    }
}

/// The full set of key regions for one frame size.
///
/// Region order is row-major, left to right — the order hit testing scans in.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    regions: Vec<KeyRegion>,
    frame: FrameSize,
}

impl KeyboardLayout {
    /// Computes the layout for the given frame dimensions.
    pub fn new(frame: FrameSize) -> Self {
        let key_width = frame.width as i32 / 12;
        let y_start = frame.height as i32 - 3 * KEY_HEIGHT - BOTTOM_MARGIN;

        let mut regions = Vec::with_capacity(26);
        for (row_idx, row) in KEY_ROWS.iter().enumerate() {
            for (col_idx, label) in row.iter().enumerate() {
                regions.push(KeyRegion {
                    x: col_idx as i32 * (key_width + KEY_GAP) + LEFT_MARGIN,
                    y: y_start + row_idx as i32 * (KEY_HEIGHT + KEY_GAP),
                    width: key_width,
                    height: KEY_HEIGHT,
                    label,
                });
            }
        }
        Self { regions, frame }
    }

    /// The frame size this layout was computed for.
    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// All regions in row-major order.
    pub fn regions(&self) -> &[KeyRegion] {
        &self.regions
    }

    /// Returns the first region (in layout order) containing `p`, if any.
    ///
    /// First match wins; there is no distance or overlap tie-break.
    pub fn hit_test(&self, p: Point) -> Option<&KeyRegion> {
        self.regions.iter().find(|r| r.contains(p))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
