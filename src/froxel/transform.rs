//! Froxel Coordinate Transforms
//!
//! The single source of the non-linear depth-distribution mapping. Every
//! stage — writers, temporal reprojection, accumulation weighting, and the
//! final composite — goes through these functions (the WGSL prelude mirrors
//! them exactly); nothing re-derives the formulas locally.
//!
//! X and Y map linearly to tangent-plane position; Z follows a power curve:
//! `view_z(z) = (z_base^(z / (depth-1)) - 1) * z_range + near`, where
//! `z_base` and `z_range` are derived from the grid depth, the near plane,
//! the volume distance, and the depth-distribution exponent. Slice 0 sits on
//! the near plane, slice `depth - 1` on `volume_distance`. The mapping is
//! strictly monotonic, so the inverse used for reprojection is well defined.

use glam::{Vec3, Vec4};

use crate::camera::CameraState;
use crate::settings::{FroxelSettings, GridSize};

/// Per-frame froxel <-> view mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FroxelTransform {
    /// `y_scale / aspect`.
    pub x_scale: f32,
    /// `1 / tan(fov_y / 2)`.
    pub y_scale: f32,
    /// Base of the depth power curve.
    pub z_base: f32,
    /// Scale of the depth power curve.
    pub z_range: f32,
    near: f32,
    grid: GridSize,
}

impl FroxelTransform {
    /// Derives the mapping from camera parameters and settings.
    ///
    /// `settings` must have been validated; `depth_distribution` of zero
    /// would degenerate the power curve.
    #[must_use]
    pub fn new(camera: &CameraState, settings: &FroxelSettings) -> Self {
        Self::from_parts(
            camera.fov_y,
            camera.aspect,
            camera.near,
            settings.volume_distance,
            settings.depth_distribution,
            settings.grid,
        )
    }

    #[must_use]
    pub fn from_parts(
        fov_y: f32,
        aspect: f32,
        near: f32,
        volume_distance: f32,
        depth_distribution: f32,
        grid: GridSize,
    ) -> Self {
        let depth = grid.depth as f32;
        let y_scale = 1.0 / (fov_y * 0.5).tan();
        let x_scale = y_scale / aspect;
        let z_base = depth_distribution * (depth - near * depth / volume_distance) + 1.0;
        let z_range = volume_distance / (depth_distribution * depth);

        Self {
            x_scale,
            y_scale,
            z_base,
            z_range,
            near,
            grid,
        }
    }

    /// The `(x_scale, y_scale, z_base, z_range)` vector uploaded to the GPU.
    #[must_use]
    pub fn params(&self) -> Vec4 {
        Vec4::new(self.x_scale, self.y_scale, self.z_base, self.z_range)
    }

    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// View depth of a slice center. Accepts fractional slices.
    #[must_use]
    pub fn view_z(&self, slice: f32) -> f32 {
        let max_z = (self.grid.depth - 1) as f32;
        (self.z_base.powf(slice / max_z) - 1.0) * self.z_range + self.near
    }

    /// Fractional slice index of a view depth. Inverse of [`Self::view_z`].
    #[must_use]
    pub fn slice(&self, view_z: f32) -> f32 {
        let max_z = (self.grid.depth - 1) as f32;
        let t = (view_z - self.near) / self.z_range + 1.0;
        max_z * t.max(1e-6).ln() / self.z_base.ln()
    }

    /// Physical thickness of slice `z`, used as the integration weight in the
    /// accumulation kernel.
    ///
    /// Boundaries follow the same power curve spaced over `depth` intervals,
    /// so the thicknesses of all slices sum to `volume_distance - near`.
    #[must_use]
    pub fn slice_thickness(&self, z: u32) -> f32 {
        let d = self.grid.depth as f32;
        let b0 = self.z_base.powf(z as f32 / d);
        let b1 = self.z_base.powf((z + 1) as f32 / d);
        (b1 - b0) * self.z_range
    }

    /// View-space position of a froxel coordinate (fractional, jittered
    /// coordinates allowed). Returns RH view space, -Z forward.
    #[must_use]
    pub fn froxel_to_view(&self, coord: Vec3) -> Vec3 {
        let vz = self.view_z(coord.z);
        let vx = (2.0 * coord.x / (self.grid.width - 1) as f32 - 1.0) * vz / self.x_scale;
        let vy = (2.0 * coord.y / (self.grid.height - 1) as f32 - 1.0) * vz / self.y_scale;
        Vec3::new(vx, vy, -vz)
    }

    /// Normalized volume coordinates of a view-space position, as used for
    /// history sampling during reprojection. Values outside [0,1] mean the
    /// position falls outside the volume.
    #[must_use]
    pub fn view_to_froxel_uvw(&self, view_pos: Vec3) -> Vec3 {
        let vz = -view_pos.z;
        let u = (view_pos.x * self.x_scale / vz + 1.0) * 0.5;
        let v = (view_pos.y * self.y_scale / vz + 1.0) * 0.5;
        let w = self.slice(vz) / (self.grid.depth - 1) as f32;
        Vec3::new(u, v, w)
    }
}
