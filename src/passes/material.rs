//! Material Volume Writer
//!
//! Fills material volumes A (scattering + absorption) and B (phase g) from
//! the registered media, in registration order. `Constant` media dispatch
//! over the whole grid with last-writer-wins; a present noise texture
//! selects the kernel variant that modulates density by animated 3D noise.
//! Unsupported media are skipped.

use std::borrow::Cow;

use glam::Vec4;
use log::debug;

use crate::color;
use crate::media::{MediumDescriptor, MediumKind};
use crate::passes::uniforms::{DynamicUniformBuffer, MediumUniforms, dynamic_uniform_entry};
use crate::passes::{SharedBindings, grid_workgroups, volumetric_shader};
use crate::registry::FroxelRegistry;
use crate::settings::GridSize;

pub struct MaterialPass {
    pipeline: wgpu::ComputePipeline,
    noise_pipeline: wgpu::ComputePipeline,
    medium_layout: wgpu::BindGroupLayout,
    noise_layout: wgpu::BindGroupLayout,
    uniforms: DynamicUniformBuffer<MediumUniforms>,
    noise_sampler: wgpu::Sampler,
}

impl MaterialPass {
    pub fn new(device: &wgpu::Device, shared: &SharedBindings) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Material Volume Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(volumetric_shader!(
                "../shaders/volumetric.wgsl"
            ))),
        });

        let medium_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Medium Uniforms Layout"),
            entries: &[dynamic_uniform_entry::<MediumUniforms>(0)],
        });

        let noise_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Medium Noise Layout"),
            entries: &[
                dynamic_uniform_entry::<MediumUniforms>(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D3,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Material Volume Pipeline Layout"),
            bind_group_layouts: &[
                Some(&shared.froxel_layout),
                Some(&shared.volumes_layout),
                Some(&medium_layout),
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Material Volume Pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("write_material_volume_constant"),
            compilation_options: Default::default(),
            cache: None,
        });

        let noise_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Material Volume Noise Pipeline Layout"),
                bind_group_layouts: &[
                    Some(&shared.froxel_layout),
                    Some(&shared.volumes_layout),
                    Some(&noise_layout),
                ],
                immediate_size: 0,
            });

        let noise_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Material Volume Noise Pipeline"),
            layout: Some(&noise_pipeline_layout),
            module: &shader,
            entry_point: Some("write_material_volume_constant_noise"),
            compilation_options: Default::default(),
            cache: None,
        });

        let noise_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Medium Noise Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            noise_pipeline,
            medium_layout,
            noise_layout,
            uniforms: DynamicUniformBuffer::new(device, "Medium Uniforms", 4),
            noise_sampler,
        }
    }

    /// Uploads one uniform slot per registered medium.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, registry: &FroxelRegistry) {
        self.uniforms
            .ensure_capacity(device, registry.medium_count() as u32);

        for (index, (_, medium)) in registry.media().enumerate() {
            let scattering = color::scattering_coefficient(medium.scattering_color);
            let (scroll, tiling) = medium
                .noise
                .as_ref()
                .map_or((Vec4::ZERO, Vec4::ONE), |noise| {
                    (
                        noise.scrolling_speed.extend(0.0),
                        noise.tiling.extend(0.0),
                    )
                });
            self.uniforms.write(
                queue,
                index as u32,
                &MediumUniforms {
                    scattering: scattering
                        .extend(color::absorption_coefficient(medium.absorption)),
                    phase: Vec4::new(medium.phase_g, 0.0, 0.0, 0.0),
                    noise_scroll: scroll,
                    noise_tiling: tiling,
                },
            );
        }
    }

    fn create_medium_bind_group(
        &self,
        device: &wgpu::Device,
        medium: &MediumDescriptor,
    ) -> wgpu::BindGroup {
        match &medium.noise {
            Some(noise) => device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Medium Noise BindGroup"),
                layout: &self.noise_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniforms.binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::TextureView(&noise.texture),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::Sampler(&self.noise_sampler),
                    },
                ],
            }),
            None => device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Medium BindGroup"),
                layout: &self.medium_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniforms.binding(),
                }],
            }),
        }
    }

    /// One dispatch per supported medium, in registration order.
    pub fn record(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        froxel_bind_group: &wgpu::BindGroup,
        volumes_bind_group: &wgpu::BindGroup,
        registry: &FroxelRegistry,
        grid_size: GridSize,
    ) {
        let (x, y, z) = grid_workgroups(grid_size);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Write Material Volume"),
            timestamp_writes: None,
        });
        pass.set_bind_group(0, froxel_bind_group, &[]);
        pass.set_bind_group(1, volumes_bind_group, &[]);

        for (index, (id, medium)) in registry.media().enumerate() {
            match medium.kind {
                MediumKind::Constant => {
                    if medium.noise.is_some() {
                        pass.set_pipeline(&self.noise_pipeline);
                    } else {
                        pass.set_pipeline(&self.pipeline);
                    }
                    let bind_group = self.create_medium_bind_group(device, medium);
                    pass.set_bind_group(
                        2,
                        &bind_group,
                        &[DynamicUniformBuffer::<MediumUniforms>::offset(index as u32)],
                    );
                    pass.dispatch_workgroups(x, y, z);
                }
                MediumKind::Unsupported(shape) => {
                    debug!("skipping unsupported medium {id:?}: {shape:?}");
                }
            }
        }
    }
}
