//! Temporal Blend Stage
//!
//! Blends each current volume with its reprojected history:
//! `current = lerp(reprojected_previous, current, alpha)`. Reprojection maps
//! the jittered froxel through the current view-to-world and the previous
//! frame's world-to-view; froxels that fall outside the previous volume keep
//! their current value. Runs once per frame per blended volume, after that
//! volume's writer.

use std::borrow::Cow;

use crate::passes::{SharedBindings, grid_workgroups, volumetric_shader};
use crate::volume::grid::VolumeGrid;

/// Which volume a blend dispatch targets. Discriminants index
/// [`TemporalBlendPass::pipelines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendTarget {
    Shadow = 0,
    Material = 1,
    Scatter = 2,
    Accumulation = 3,
}

impl BlendTarget {
    fn entry_point(self) -> &'static str {
        match self {
            Self::Shadow => "temporal_blend_shadow",
            Self::Material => "temporal_blend_material",
            Self::Scatter => "temporal_blend_scatter",
            Self::Accumulation => "temporal_blend_accumulation",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Shadow => "Temporal Blend Shadow",
            Self::Material => "Temporal Blend Material",
            Self::Scatter => "Temporal Blend Scatter",
            Self::Accumulation => "Temporal Blend Accumulation",
        }
    }
}

const TARGETS: [BlendTarget; 4] = [
    BlendTarget::Shadow,
    BlendTarget::Material,
    BlendTarget::Scatter,
    BlendTarget::Accumulation,
];

pub struct TemporalBlendPass {
    pipelines: [wgpu::ComputePipeline; 4],
    history_layout: wgpu::BindGroupLayout,
    history_sampler: wgpu::Sampler,
}

impl TemporalBlendPass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Temporal Blend Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/volumetric.wgsl"
            ))),
        });

        let history_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Temporal History Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D3,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Temporal Blend Pipeline Layout"),
            bind_group_layouts: &[
                Some(&shared.froxel_layout),
                Some(&shared.volumes_layout),
                Some(&history_layout),
            ],
            immediate_size: 0,
        });

        let pipelines = TARGETS.map(|target| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(target.label()),
                layout: Some(&layout),
                module: &shader,
                entry_point: Some(target.entry_point()),
                compilation_options: Default::default(),
                cache: None,
            })
        });

        let history_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Temporal History Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipelines,
            history_layout,
            history_sampler,
        }
    }

    /// Blends `target`'s front slot against its back (history) slot.
    pub fn record(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        froxel_bind_group: &wgpu::BindGroup,
        volumes_bind_group: &wgpu::BindGroup,
        grid: &VolumeGrid,
        target: BlendTarget,
    ) {
        let history_view = match target {
            BlendTarget::Shadow => &grid.shadow.back().view,
            BlendTarget::Material => &grid.material_a.back().view,
            BlendTarget::Scatter => &grid.scatter.back().view,
            BlendTarget::Accumulation => &grid.accumulation.back().view,
        };
        let history_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Temporal History BindGroup"),
            layout: &self.history_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(history_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.history_sampler),
                },
            ],
        });

        let pipeline = &self.pipelines[target as usize];
        let (x, y, z) = grid_workgroups(grid.size());
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(target.label()),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, volumes_bind_group, &[]);
        pass.set_bind_group(2, &history_bind_group, &[]);
        pass.dispatch_workgroups(x, y, z);
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_target_discriminants_index_the_pipeline_array() {
        for (index, target) in TARGETS.iter().enumerate() {
            assert_eq!(
                *target as usize, index,
                "{target:?} must select the pipeline built from TARGETS[{index}]",
            );
        }
    }
}
