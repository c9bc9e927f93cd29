//! Per-Froxel Kernel Math
//!
//! CPU mirrors of the arithmetic inside the scatter, blend, and accumulation
//! kernels, extracted here so the numeric behavior is testable without a GPU.
//! The WGSL in `shaders/volumetric.wgsl` must stay in lockstep with these
//! functions.

use glam::{Vec3, Vec4};

use super::transform::FroxelTransform;

/// Henyey-Greenstein phase function.
#[must_use]
pub fn henyey_greenstein(g: f32, cos_theta: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 + g2 - 2.0 * g * cos_theta).max(1e-4);
    (1.0 - g2) / (4.0 * std::f32::consts::PI * denom.powf(1.5))
}

/// Extinction coefficient of a material sample: absorption plus the mean
/// scattering channel.
#[must_use]
pub fn extinction(material_a: Vec4) -> f32 {
    material_a.w + (material_a.x + material_a.y + material_a.z) / 3.0
}

/// One directional light's contribution to a froxel of the scatter volume.
///
/// `light_dir` is the direction light travels; `view_dir` points from the
/// camera towards the froxel. Contributions from multiple lights sum.
#[must_use]
pub fn scatter_contribution(
    material_a: Vec4,
    phase_g: f32,
    visibility: f32,
    light_color: Vec3,
    light_dir: Vec3,
    view_dir: Vec3,
) -> Vec4 {
    let cos_theta = light_dir.dot(view_dir);
    let phase = henyey_greenstein(phase_g, cos_theta);
    let in_scatter = Vec3::new(material_a.x, material_a.y, material_a.z)
        * light_color
        * visibility
        * phase;
    Vec4::new(in_scatter.x, in_scatter.y, in_scatter.z, extinction(material_a))
}

/// Temporal blend: `lerp(reprojected_previous, current, alpha)`.
#[must_use]
pub fn temporal_blend(previous: Vec4, current: Vec4, alpha: f32) -> Vec4 {
    previous.lerp(current, alpha)
}

/// Integrates one (x, y) column of the scatter volume front to back.
///
/// Returns one accumulation sample per slice: rgb is in-scattered radiance
/// reaching the camera from everything up to and including the slice, alpha
/// is the remaining transmittance. Each slice is weighted by its physical
/// thickness from the depth distribution.
#[must_use]
pub fn accumulate_column(scatter: &[Vec4], transform: &FroxelTransform) -> Vec<Vec4> {
    let mut radiance = Vec3::ZERO;
    let mut transmittance = 1.0_f32;
    let mut out = Vec::with_capacity(scatter.len());

    for (z, s) in scatter.iter().enumerate() {
        let dz = transform.slice_thickness(z as u32);
        radiance += Vec3::new(s.x, s.y, s.z) * dz * transmittance;
        transmittance *= (-s.w * dz).exp();
        out.push(Vec4::new(radiance.x, radiance.y, radiance.z, transmittance));
    }
    out
}

/// Final composite blend at one pixel: `scene * transmittance + radiance`.
#[must_use]
pub fn composite_over(scene: Vec3, accumulated: Vec4) -> Vec3 {
    scene * accumulated.w + Vec3::new(accumulated.x, accumulated.y, accumulated.z)
}
