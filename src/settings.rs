//! Volumetric Settings
//!
//! Tunable parameters of the froxel pipeline. All values are plain data; the
//! renderer validates them once at construction (and again on reconfiguration)
//! via [`FroxelSettings::validate`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use froxel::{FroxelSettings, GridSize};
//!
//! // Reference configuration: 160x88x64 grid, 100m volume.
//! let settings = FroxelSettings::default();
//!
//! // A denser, shorter-range volume:
//! let settings = FroxelSettings {
//!     grid: GridSize::new(240, 132, 96),
//!     volume_distance: 50.0,
//!     ..Default::default()
//! };
//! ```

use crate::errors::{FroxelError, Result};

/// Resolution of the froxel grid in cells.
///
/// X and Y span the screen; Z spans view depth between the camera near plane
/// and [`FroxelSettings::volume_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl GridSize {
    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(160, 88, 64)
    }
}

/// Configuration of the volumetric fog effect.
///
/// | Field                 | Default   | Range        |
/// |-----------------------|-----------|--------------|
/// | `grid`                | 160x88x64 | each dim ≥ 2 |
/// | `volume_distance`     | 100.0     | > 0          |
/// | `depth_distribution`  | 0.5       | (0, 2]       |
/// | `temporal_blend_alpha`| 1/7       | (0, 1]       |
/// | `max_steps`           | 50        | ≥ 1          |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FroxelSettings {
    /// Froxel grid resolution. Fixed for the lifetime of a [`crate::VolumetricRenderer`]
    /// unless explicitly reallocated.
    pub grid: GridSize,
    /// Far extent of the volume along view depth, in world units.
    pub volume_distance: f32,
    /// Exponent controlling the non-linearity of the Z axis. Higher values
    /// concentrate slices near the camera.
    pub depth_distribution: f32,
    /// History blend weight. Smaller values converge slower but resolve more
    /// sub-froxel detail from the jitter sequence.
    pub temporal_blend_alpha: f32,
    /// Ray-march iteration cap for the final composite, in slices.
    pub max_steps: u32,
}

impl Default for FroxelSettings {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            volume_distance: 100.0,
            depth_distribution: 0.5,
            temporal_blend_alpha: 1.0 / 7.0,
            max_steps: 50,
        }
    }
}

impl FroxelSettings {
    /// Checks every tunable against its valid range.
    pub fn validate(&self) -> Result<()> {
        let g = self.grid;
        if g.width < 2 || g.height < 2 || g.depth < 2 {
            return Err(FroxelError::InvalidSettings(format!(
                "grid dimensions must each be at least 2, got {}x{}x{}",
                g.width, g.height, g.depth
            )));
        }
        if self.volume_distance <= 0.0 || !self.volume_distance.is_finite() {
            return Err(FroxelError::InvalidSettings(format!(
                "volume_distance must be positive, got {}",
                self.volume_distance
            )));
        }
        if self.depth_distribution <= 0.0 || self.depth_distribution > 2.0 {
            return Err(FroxelError::InvalidSettings(format!(
                "depth_distribution must be in (0, 2], got {}",
                self.depth_distribution
            )));
        }
        if self.temporal_blend_alpha <= 0.0 || self.temporal_blend_alpha > 1.0 {
            return Err(FroxelError::InvalidSettings(format!(
                "temporal_blend_alpha must be in (0, 1], got {}",
                self.temporal_blend_alpha
            )));
        }
        if self.max_steps == 0 {
            return Err(FroxelError::InvalidSettings(
                "max_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
