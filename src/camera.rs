//! Host Camera Snapshot
//!
//! [`CameraState`] is the per-frame camera data the host hands to the
//! renderer. It also derives the screen-triangle corner vectors the final
//! composite uses: the four far-plane frustum corners are collapsed into a
//! single triangle whose off-screen corners are over-scaled by 3x, so one
//! draw covers the screen without a diagonal seam.

use glam::{Mat4, Vec3};

/// Per-frame camera parameters, right-handed view space with -Z forward.
#[derive(Debug, Clone, Copy)]
pub struct CameraState {
    /// Rigid transform from view space to world space.
    pub view_to_world: Mat4,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl CameraState {
    /// Builds a camera state looking from `eye` towards `target`.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            view_to_world: Mat4::look_at_rh(eye, target, up).inverse(),
            fov_y,
            aspect,
            near,
            far,
        }
    }

    #[must_use]
    pub fn world_to_view(&self) -> Mat4 {
        self.view_to_world.inverse()
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.view_to_world.w_axis.truncate()
    }

    /// World-space corner vectors of the over-scaled screen triangle, divided
    /// by the far plane distance.
    ///
    /// Corner 0 sits on the top-left frustum corner; corners 1 and 2 are
    /// pushed 3x past the bottom and right edges respectively. Dividing by
    /// `far` normalizes the forward component to 1, which the composite
    /// fragment stage relies on.
    #[must_use]
    pub fn screen_triangle_corners(&self) -> [Vec3; 3] {
        let h = self.far * (self.fov_y * 0.5).tan();
        let w = h * self.aspect;

        let corners_view = [
            Vec3::new(-w, h, -self.far),
            Vec3::new(-w, -3.0 * h, -self.far),
            Vec3::new(3.0 * w, h, -self.far),
        ];

        corners_view.map(|c| self.view_to_world.transform_vector3(c) / self.far)
    }
}
