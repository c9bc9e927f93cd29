//! Uniform Layouts & Upload
//!
//! Pod structs matching the WGSL uniform blocks, plus a small dynamic-offset
//! buffer for per-light and per-medium parameters (256-byte stride, one slot
//! per descriptor per frame).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Minimum dynamic uniform alignment guaranteed by WebGPU.
pub const DYNAMIC_STRIDE: u64 = 256;

/// Mirrors `FroxelUniforms` in `froxel_common.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FroxelUniforms {
    pub view_to_world: Mat4,
    pub world_to_view: Mat4,
    pub prev_world_to_view: Mat4,
    /// x_scale, y_scale, z_base, z_range.
    pub froxel_params: Vec4,
    /// width-1, height-1, depth-1, near.
    pub grid_max: Vec4,
    /// xyz: sample offset, w: effective blend alpha.
    pub jitter: Vec4,
    /// volume_distance, time, far, max_steps.
    pub scene: Vec4,
    pub corner0: Vec4,
    pub corner1: Vec4,
    pub corner2: Vec4,
}

/// Mirrors `MediumUniforms` in `volumetric.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MediumUniforms {
    /// rgb: scattering coefficient, a: absorption coefficient.
    pub scattering: Vec4,
    /// x: phase g.
    pub phase: Vec4,
    pub noise_scroll: Vec4,
    pub noise_tiling: Vec4,
}

/// Mirrors `LightUniforms` in `volumetric.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniforms {
    /// rgb: linear color times intensity.
    pub color: Vec4,
    /// xyz: travel direction, normalized.
    pub direction: Vec4,
}

/// Mirrors `ShadowLightUniforms` in `shadow.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ShadowLightUniforms {
    pub view_projection: Mat4,
}

/// A uniform buffer holding one `T` per 256-byte slot, addressed with
/// dynamic offsets.
///
/// Growing recreates the buffer, which invalidates bind groups referencing
/// it; passes rebuild those every frame, so growth is transparent.
#[derive(Debug)]
pub struct DynamicUniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    capacity: u32,
    label: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> DynamicUniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &'static str, capacity: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::create_buffer(device, label, capacity),
            capacity,
            label,
            _marker: std::marker::PhantomData,
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &'static str, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: DYNAMIC_STRIDE * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Grows the buffer if `count` slots do not fit.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, count: u32) {
        if count > self.capacity {
            self.capacity = count.next_power_of_two();
            self.buffer = Self::create_buffer(device, self.label, self.capacity);
        }
    }

    /// Uploads one slot. `index` must be within the ensured capacity.
    pub fn write(&self, queue: &wgpu::Queue, index: u32, value: &T) {
        queue.write_buffer(
            &self.buffer,
            DYNAMIC_STRIDE * u64::from(index),
            bytemuck::bytes_of(value),
        );
    }

    #[must_use]
    pub fn offset(index: u32) -> u32 {
        (DYNAMIC_STRIDE as u32) * index
    }

    #[must_use]
    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        })
    }
}

/// Layout entry for one dynamic uniform slot.
pub(crate) fn dynamic_uniform_entry<T: Pod>(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}
