//! Shadow Volume Writer
//!
//! Rasterizes directional-light visibility into the scalar shadow volume
//! from a host-supplied shadow map. The orchestrator calls
//! [`ShadowVolumePass::contribute`] once per registered light, in
//! registration order, after [`ShadowVolumePass::prepare`] has uploaded the
//! shared dispatch parameters — lights without a shadow map binding this
//! frame are skipped and their froxels stay fully lit.

use std::borrow::Cow;

use crate::light::ShadowMapBinding;
use crate::passes::uniforms::{DynamicUniformBuffer, ShadowLightUniforms, dynamic_uniform_entry};
use crate::passes::{SharedBindings, grid_workgroups, volumetric_shader};
use crate::volume::grid::{SHADOW_FORMAT, VolumeGrid};

pub struct ShadowVolumePass {
    pipeline: wgpu::ComputePipeline,
    volume_layout: wgpu::BindGroupLayout,
    light_layout: wgpu::BindGroupLayout,
    uniforms: DynamicUniformBuffer<ShadowLightUniforms>,
    comparison_sampler: wgpu::Sampler,
}

impl ShadowVolumePass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Volume Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/shadow.wgsl"
            ))),
        });

        let volume_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Volume Target Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::StorageTexture {
                    access: wgpu::StorageTextureAccess::WriteOnly,
                    format: SHADOW_FORMAT,
                    view_dimension: wgpu::TextureViewDimension::D3,
                },
                count: None,
            }],
        });

        let light_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Light Layout"),
            entries: &[
                dynamic_uniform_entry::<ShadowLightUniforms>(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Volume Pipeline Layout"),
            bind_group_layouts: &[Some(&shared.froxel_layout), Some(&volume_layout), Some(&light_layout)],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Shadow Volume Pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("write_shadow_volume_dir"),
            compilation_options: Default::default(),
            cache: None,
        });

        let comparison_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Comparison Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            pipeline,
            volume_layout,
            light_layout,
            uniforms: DynamicUniformBuffer::new(device, "Shadow Light Uniforms", 4),
            comparison_sampler,
        }
    }

    /// Uploads per-light view-projection matrices for this frame's
    /// contributions. Slot indices follow light registration order.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        contributions: &[(u32, &ShadowMapBinding<'_>)],
    ) {
        let max_slot = contributions.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        self.uniforms.ensure_capacity(device, max_slot);
        for (slot, binding) in contributions {
            self.uniforms.write(
                queue,
                *slot,
                &ShadowLightUniforms {
                    view_projection: binding.view_projection,
                },
            );
        }
    }

    /// Records one light's shadow dispatch into the shared shadow volume.
    pub fn contribute(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        froxel_bind_group: &wgpu::BindGroup,
        grid: &VolumeGrid,
        slot: u32,
        binding: &ShadowMapBinding<'_>,
    ) {
        let volume_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Volume Target BindGroup"),
            layout: &self.volume_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&grid.shadow.front().view),
            }],
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Light BindGroup"),
            layout: &self.light_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniforms.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(binding.shadow_map),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.comparison_sampler),
                },
            ],
        });

        let (x, y, z) = grid_workgroups(grid.size());
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Write Shadow Volume"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, &volume_bind_group, &[]);
        pass.set_bind_group(
            2,
            &light_bind_group,
            &[DynamicUniformBuffer::<ShadowLightUniforms>::offset(slot)],
        );
        pass.dispatch_workgroups(x, y, z);
    }
}
