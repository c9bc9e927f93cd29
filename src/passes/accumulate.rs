//! Accumulation Stage
//!
//! Integrates the scatter volume along the depth axis into per-slice
//! accumulated radiance and transmittance. One thread per (x, y) column
//! walks the slices front to back, weighting each by its physical thickness
//! from the depth distribution; dispatch depth is 1.

use std::borrow::Cow;

use crate::passes::{SharedBindings, volumetric_shader, workgroup_count};
use crate::settings::GridSize;

pub struct AccumulatePass {
    pipeline: wgpu::ComputePipeline,
}

impl AccumulatePass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Accumulation Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/volumetric.wgsl"
            ))),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Accumulation Pipeline Layout"),
            bind_group_layouts: &[Some(&shared.froxel_layout), Some(&shared.volumes_layout)],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Accumulation Pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("accumulation"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self { pipeline }
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        froxel_bind_group: &wgpu::BindGroup,
        volumes_bind_group: &wgpu::BindGroup,
        grid_size: GridSize,
    ) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Accumulation"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, volumes_bind_group, &[]);
        pass.dispatch_workgroups(
            workgroup_count(grid_size.width),
            workgroup_count(grid_size.height),
            1,
        );
    }
}
