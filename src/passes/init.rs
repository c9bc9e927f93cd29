//! Per-frame volume initialization: clears all five current volumes in one
//! dispatch before any writer runs. Shadow resets to fully lit, accumulation
//! to full transmittance, everything else to zero.

use std::borrow::Cow;

use crate::passes::{SharedBindings, grid_workgroups, volumetric_shader};
use crate::settings::GridSize;

pub struct InitPass {
    pipeline: wgpu::ComputePipeline,
}

impl InitPass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Volumetric Init Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/volumetric.wgsl"
            ))),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Volumetric Init Pipeline Layout"),
            bind_group_layouts: &[Some(&shared.froxel_layout), Some(&shared.volumes_layout)],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Volumetric Init Pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("init_all_volumes"),
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
        let (x, y, z) = grid_workgroups(grid_size);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Volumetric Init"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, volumes_bind_group, &[]);
        pass.dispatch_workgroups(x, y, z);
    }
}
