//! Volume Texture Allocation
//!
//! 3D textures over the froxel grid. Allocation is validated against the
//! device's 3D texture limit up front so failure surfaces as a
//! [`crate::FroxelError`] instead of a device loss; reallocation explicitly
//! destroys the old texture before creating the new one.

use crate::errors::{FroxelError, Result};
use crate::settings::GridSize;

/// One GPU volume and its default view.
#[derive(Debug)]
pub struct VolumeTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: GridSize,
}

impl VolumeTexture {
    /// Allocates a storage + sampled 3D texture over the grid.
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        size: GridSize,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let limit = device.limits().max_texture_dimension_3d;
        if size.width == 0
            || size.height == 0
            || size.depth == 0
            || size.width > limit
            || size.height > limit
            || size.depth > limit
        {
            return Err(FroxelError::VolumeAllocation { label, size, limit });
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: size.depth,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            format,
            size,
        })
    }

    /// Destroys this volume and allocates a replacement with a new size.
    pub fn reallocate(
        self,
        device: &wgpu::Device,
        label: &'static str,
        size: GridSize,
    ) -> Result<Self> {
        let format = self.format;
        self.texture.destroy();
        Self::new(device, label, size, format)
    }
}
