//! Volume Grid Manager
//!
//! Owns every froxel volume of the effect: shadow, material A/B, scatter,
//! and accumulation, each (except material B) with a paired history volume.
//! History is double-buffered as two named slots — `front` is written this
//! frame, `back` holds last frame's result — exchanged by a single
//! [`VolumeGrid::swap_history`] call at the end of the frame, never in place.

use log::debug;

use crate::errors::Result;
use crate::settings::GridSize;
use crate::volume::texture::VolumeTexture;

/// Scalar visibility volume format.
pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;
/// Format of all four-channel volumes.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// A current/history volume pair with named slots.
#[derive(Debug)]
pub struct DoubleBuffered {
    front: VolumeTexture,
    back: VolumeTexture,
}

impl DoubleBuffered {
    fn new(
        device: &wgpu::Device,
        label: &'static str,
        history_label: &'static str,
        size: GridSize,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        Ok(Self {
            front: VolumeTexture::new(device, label, size, format)?,
            back: VolumeTexture::new(device, history_label, size, format)?,
        })
    }

    fn reallocate(
        self,
        device: &wgpu::Device,
        label: &'static str,
        history_label: &'static str,
        size: GridSize,
    ) -> Result<Self> {
        Ok(Self {
            front: self.front.reallocate(device, label, size)?,
            back: self.back.reallocate(device, history_label, size)?,
        })
    }

    /// The volume written this frame.
    #[must_use]
    pub fn front(&self) -> &VolumeTexture {
        &self.front
    }

    /// Last frame's result, read by temporal reprojection.
    #[must_use]
    pub fn back(&self) -> &VolumeTexture {
        &self.back
    }

    /// Exchanges the slots. Called exactly once per frame, after every stage
    /// that reads history has run.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/// The full set of froxel volumes for one camera.
#[derive(Debug)]
pub struct VolumeGrid {
    size: GridSize,
    pub shadow: DoubleBuffered,
    pub material_a: DoubleBuffered,
    /// Phase g plus reserved channels; rewritten fully each frame, so it
    /// carries no history pair.
    pub material_b: VolumeTexture,
    pub scatter: DoubleBuffered,
    pub accumulation: DoubleBuffered,
}

impl VolumeGrid {
    /// Allocates all volumes. Any failure is fatal for the effect.
    pub fn new(device: &wgpu::Device, size: GridSize) -> Result<Self> {
        let grid = Self {
            size,
            shadow: DoubleBuffered::new(
                device,
                "Shadow Volume",
                "Shadow Volume History",
                size,
                SHADOW_FORMAT,
            )?,
            material_a: DoubleBuffered::new(
                device,
                "Material Volume A",
                "Material Volume A History",
                size,
                COLOR_FORMAT,
            )?,
            material_b: VolumeTexture::new(device, "Material Volume B", size, COLOR_FORMAT)?,
            scatter: DoubleBuffered::new(
                device,
                "Scatter Volume",
                "Scatter Volume History",
                size,
                COLOR_FORMAT,
            )?,
            accumulation: DoubleBuffered::new(
                device,
                "Accumulation Volume",
                "Accumulation Volume History",
                size,
                COLOR_FORMAT,
            )?,
        };
        debug!(
            "allocated froxel volumes at {}x{}x{}",
            size.width, size.height, size.depth
        );
        Ok(grid)
    }

    /// Destroys every volume and allocates replacements at a new resolution,
    /// returning the new grid handle.
    ///
    /// On success the grid contents are undefined until the next frame's init
    /// pass; history is treated as invalid by the caller.
    pub fn reallocate(self, device: &wgpu::Device, size: GridSize) -> Result<Self> {
        let grid = Self {
            size,
            shadow: self.shadow.reallocate(
                device,
                "Shadow Volume",
                "Shadow Volume History",
                size,
            )?,
            material_a: self.material_a.reallocate(
                device,
                "Material Volume A",
                "Material Volume A History",
                size,
            )?,
            material_b: self
                .material_b
                .reallocate(device, "Material Volume B", size)?,
            scatter: self.scatter.reallocate(
                device,
                "Scatter Volume",
                "Scatter Volume History",
                size,
            )?,
            accumulation: self.accumulation.reallocate(
                device,
                "Accumulation Volume",
                "Accumulation Volume History",
                size,
            )?,
        };
        debug!(
            "reallocated froxel volumes at {}x{}x{}",
            size.width, size.height, size.depth
        );
        Ok(grid)
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// End-of-frame history swap for every double-buffered volume.
    pub fn swap_history(&mut self) {
        self.shadow.swap();
        self.material_a.swap();
        self.scatter.swap();
        self.accumulation.swap();
    }
}
