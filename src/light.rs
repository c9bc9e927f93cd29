//! Light Descriptors
//!
//! External light sources feeding the scatter and shadow writers. Only
//! directional lights are fully supported; point and spot variants are
//! accepted by the registry but skipped deterministically by every pass.

use glam::{Mat4, Vec3};

use crate::registry::generate_descriptor_id;

/// Stable identity of a registered light.
///
/// Minted once per scene light and reused across register/unregister cycles,
/// so repeated registration stays idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub(crate) u64);

impl LightId {
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_descriptor_id())
    }
}

/// Light variants the scatter writer understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Fully supported. `direction` is the direction light travels,
    /// normalized.
    Directional { direction: Vec3 },
    /// Registered but skipped by every pass.
    Unsupported(UnsupportedLight),
}

/// Light types the pipeline accepts without rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedLight {
    Point,
    Spot,
}

/// A registered light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    pub kind: LightKind,
    /// Display-space color; decoded to linear by the scatter writer.
    pub color: Vec3,
    pub intensity: f32,
}

impl LightDescriptor {
    #[must_use]
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize(),
            },
            color,
            intensity,
        }
    }
}

/// Per-frame shadow map contribution for one directional light.
///
/// Supplied by the host after its shadow pass has rendered; lights without a
/// binding this frame keep their froxels fully lit.
#[derive(Debug, Clone, Copy)]
pub struct ShadowMapBinding<'a> {
    /// Depth view of the light's shadow map.
    pub shadow_map: &'a wgpu::TextureView,
    /// World -> light clip transform used to render that map.
    pub view_projection: Mat4,
}
