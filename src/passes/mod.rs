//! Compute and render passes of the froxel pipeline.
//!
//! Pipelines and bind group layouts are created once per pass at
//! construction; bind groups that depend on per-frame resources (history
//! slots, shadow maps, noise textures) are rebuilt in each pass's record
//! step. Group 0 (frame uniforms) and group 1 (the current volumes) share
//! layouts across all kernels, defined in [`SharedBindings`].

pub mod accumulate;
pub mod composite;
pub mod init;
pub mod material;
pub mod scatter;
pub mod shadow;
pub mod temporal;
pub mod uniforms;

use crate::settings::GridSize;
use crate::volume::grid::{COLOR_FORMAT, SHADOW_FORMAT, VolumeGrid};

/// Compute workgroup edge length; kernels use 8x8x8 (8x8x1 for
/// accumulation).
pub(crate) const WORKGROUP_SIZE: u32 = 8;

pub(crate) fn workgroup_count(extent: u32) -> u32 {
    extent.div_ceil(WORKGROUP_SIZE)
}

/// Full-grid dispatch extents.
pub(crate) fn grid_workgroups(size: GridSize) -> (u32, u32, u32) {
    (
        workgroup_count(size.width),
        workgroup_count(size.height),
        workgroup_count(size.depth),
    )
}

fn storage_volume_entry(
    binding: u32,
    format: wgpu::TextureFormat,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::ReadWrite,
            format,
            view_dimension: wgpu::TextureViewDimension::D3,
        },
        count: None,
    }
}

/// Layouts shared by every kernel in the volumetric module.
pub(crate) struct SharedBindings {
    /// Group 0: the per-frame [`uniforms::FroxelUniforms`] buffer.
    pub froxel_layout: wgpu::BindGroupLayout,
    /// Group 1: all five current volumes as read-write storage.
    pub volumes_layout: wgpu::BindGroupLayout,
}

impl SharedBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let froxel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Froxel Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE
                    | wgpu::ShaderStages::VERTEX
                    | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<uniforms::FroxelUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let volumes_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Froxel Volumes Layout"),
            entries: &[
                storage_volume_entry(0, SHADOW_FORMAT),
                storage_volume_entry(1, COLOR_FORMAT),
                storage_volume_entry(2, COLOR_FORMAT),
                storage_volume_entry(3, COLOR_FORMAT),
                storage_volume_entry(4, COLOR_FORMAT),
            ],
        });

        Self {
            froxel_layout,
            volumes_layout,
        }
    }

    /// Binds the current (front) slot of every volume.
    pub fn create_volumes_bind_group(
        &self,
        device: &wgpu::Device,
        grid: &VolumeGrid,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Froxel Volumes BindGroup"),
            layout: &self.volumes_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&grid.shadow.front().view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&grid.material_a.front().view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&grid.material_b.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&grid.scatter.front().view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&grid.accumulation.front().view),
                },
            ],
        })
    }
}

/// Composes the shared WGSL prelude with a kernel module.
macro_rules! volumetric_shader {
    ($file:literal) => {
        concat!(
            include_str!("../shaders/froxel_common.wgsl"),
            include_str!($file)
        )
    };
}

pub(crate) use volumetric_shader;
