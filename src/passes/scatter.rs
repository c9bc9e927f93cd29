//! Scatter Volume Writer
//!
//! Computes in-scattered radiance per froxel from material, shadow
//! visibility, and light parameters. One dispatch per directional light; the
//! kernel reads, adds, and writes back the scatter texel, so contributions
//! from multiple lights sum instead of overwriting. Unsupported light kinds
//! are skipped.

use std::borrow::Cow;

use glam::Vec3;
use log::debug;

use crate::color;
use crate::light::LightKind;
use crate::passes::uniforms::{DynamicUniformBuffer, LightUniforms, dynamic_uniform_entry};
use crate::passes::{SharedBindings, grid_workgroups, volumetric_shader};
use crate::registry::FroxelRegistry;
use crate::settings::GridSize;

pub struct ScatterPass {
    pipeline: wgpu::ComputePipeline,
    light_layout: wgpu::BindGroupLayout,
    uniforms: DynamicUniformBuffer<LightUniforms>,
}

impl ScatterPass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scatter Volume Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/volumetric.wgsl"
            ))),
        });

        let light_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scatter Light Layout"),
            entries: &[dynamic_uniform_entry::<LightUniforms>(1)],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scatter Volume Pipeline Layout"),
            bind_group_layouts: &[
                Some(&shared.froxel_layout),
                Some(&shared.volumes_layout),
                Some(&light_layout),
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Scatter Volume Pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("write_scatter_volume_dir"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            light_layout,
            uniforms: DynamicUniformBuffer::new(device, "Scatter Light Uniforms", 4),
        }
    }

    /// Uploads one uniform slot per registered light. Colors are decoded to
    /// linear with the fixed 2.2 exponent here, once per light per frame.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, registry: &FroxelRegistry) {
        self.uniforms
            .ensure_capacity(device, registry.light_count() as u32);

        for (index, (_, light)) in registry.lights().enumerate() {
            let direction = match light.kind {
                LightKind::Directional { direction } => direction,
                LightKind::Unsupported(_) => Vec3::ZERO,
            };
            self.uniforms.write(
                queue,
                index as u32,
                &LightUniforms {
                    color: color::light_linear_color(light.color, light.intensity).extend(1.0),
                    direction: direction.extend(0.0),
                },
            );
        }
    }

    /// One additive dispatch per directional light, in registration order.
    pub fn record(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        froxel_bind_group: &wgpu::BindGroup,
        volumes_bind_group: &wgpu::BindGroup,
        registry: &FroxelRegistry,
        grid_size: GridSize,
    ) {
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scatter Light BindGroup"),
            layout: &self.light_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 1,
                resource: self.uniforms.binding(),
            }],
        });

        let (x, y, z) = grid_workgroups(grid_size);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Write Scatter Volume"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, volumes_bind_group, &[]);

        for (index, (id, light)) in registry.lights().enumerate() {
            match light.kind {
                LightKind::Directional { .. } => {
                    pass.set_bind_group(
                        2,
                        &light_bind_group,
                        &[DynamicUniformBuffer::<LightUniforms>::offset(index as u32)],
                    );
                    pass.dispatch_workgroups(x, y, z);
                }
                LightKind::Unsupported(kind) => {
                    debug!("skipping unsupported light {id:?}: {kind:?}");
                }
            }
        }
    }
}
