//! Participating Media Descriptors
//!
//! Registered media fill the material volume each frame. `Constant` media
//! cover the whole grid (no spatial bounds), applied in registration order
//! with last-writer-wins per cell. `Box` media are accepted but skipped.

use glam::Vec3;

use crate::registry::generate_descriptor_id;

/// Stable identity of a registered medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediumId(pub(crate) u64);

impl MediumId {
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_descriptor_id())
    }
}

/// Medium variants the material writer understands.
#[derive(Debug, Clone, PartialEq)]
pub enum MediumKind {
    /// Homogeneous fog filling the whole grid.
    Constant,
    /// Registered but skipped by the material writer.
    Unsupported(UnsupportedMedium),
}

/// Medium shapes the pipeline accepts without rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedMedium {
    Box,
}

/// Animated density modulation for a `Constant` medium.
///
/// Presence of a noise texture selects the noise kernel variant; density is
/// sampled from the texture at world position scaled by `tiling` and scrolled
/// by `scrolling_speed` over time.
#[derive(Debug, Clone)]
pub struct NoiseParams {
    /// 3D single-channel noise texture view, filterable.
    pub texture: wgpu::TextureView,
    pub scrolling_speed: Vec3,
    pub tiling: Vec3,
}

/// A registered participating medium.
#[derive(Debug, Clone)]
pub struct MediumDescriptor {
    pub kind: MediumKind,
    /// Authored scattering color, scaled to a physical coefficient before
    /// upload (see [`crate::color::scattering_coefficient`]).
    pub scattering_color: Vec3,
    /// Authored absorption in [0,1], scaled before upload.
    pub absorption: f32,
    /// Phase-function anisotropy, in [0,1] for forward scattering.
    pub phase_g: f32,
    pub noise: Option<NoiseParams>,
}

impl MediumDescriptor {
    #[must_use]
    pub fn constant(scattering_color: Vec3, absorption: f32, phase_g: f32) -> Self {
        Self {
            kind: MediumKind::Constant,
            scattering_color,
            absorption,
            phase_g,
            noise: None,
        }
    }
}
