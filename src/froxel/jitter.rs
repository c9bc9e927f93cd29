//! Temporal Jitter Sequence
//!
//! Seven sub-froxel sample offsets derived from close-packing of equal
//! spheres: a center point plus a hexagon of six neighbours at spacing `R`,
//! so every XY offset stays within a disk of radius `R`. The pattern is
//! rotated by 15 degrees to decorrelate it from the grid axes, and each
//! sample carries a unique Z phase from {1/14, 3/14, ..., 13/14}.
//!
//! The sequence is fixed at startup: the same frame index always yields the
//! same offset.

use glam::Vec3;

/// Radius of the XY jitter disk.
pub const JITTER_RADIUS: f32 = 0.170_540_69;

const COS_15: f32 = 0.965_925_826_289_068_28;
const SIN_15: f32 = 0.258_819_045_102_520_76;

/// The per-frame sample offset pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterSequence {
    offsets: [Vec3; 7],
}

impl Default for JitterSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSequence {
    /// Builds the rotated close-packed pattern.
    #[must_use]
    pub fn new() -> Self {
        let r = JITTER_RADIUS;
        // Hexagon neighbours at spacing r around the center sample. The Z
        // phases visit the odd fourteenths in an order that keeps the running
        // average close to the center.
        let h = r * 0.5;
        let s = h * 3.0_f32.sqrt();
        let mut offsets = [
            Vec3::new(0.0, 0.0, 1.0 / 14.0),
            Vec3::new(-r, 0.0, 3.0 / 14.0),
            Vec3::new(r, 0.0, 5.0 / 14.0),
            Vec3::new(-h, -s, 7.0 / 14.0),
            Vec3::new(h, s, 9.0 / 14.0),
            Vec3::new(h, -s, 11.0 / 14.0),
            Vec3::new(-h, s, 13.0 / 14.0),
        ];

        for offset in &mut offsets {
            let (x, y) = (offset.x, offset.y);
            offset.x = x * COS_15 - y * SIN_15;
            offset.y = x * SIN_15 + y * COS_15;
        }

        Self { offsets }
    }

    /// Offset for a frame, selected by `frame_index % 7`.
    #[must_use]
    pub fn offset(&self, frame_index: u64) -> Vec3 {
        self.offsets[(frame_index % 7) as usize]
    }

    #[must_use]
    pub fn offsets(&self) -> &[Vec3; 7] {
        &self.offsets
    }
}
