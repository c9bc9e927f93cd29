//! Volumetric Renderer
//!
//! Orchestrates the per-frame froxel pipeline: clear, shadow, material,
//! scatter, accumulation, each followed by its temporal blend, then a
//! composite draw over the host's color target. The host owns the device,
//! queue, encoder, depth buffer, and shadow maps; this renderer owns the
//! volume textures, the registry of participating lights and media, and the
//! temporal history.

use glam::Mat4;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::camera::CameraState;
use crate::errors::{FroxelError, Result};
use crate::froxel::jitter::JitterSequence;
use crate::froxel::transform::FroxelTransform;
use crate::light::{LightId, LightKind, ShadowMapBinding};
use crate::passes::accumulate::AccumulatePass;
use crate::passes::composite::CompositePass;
use crate::passes::init::InitPass;
use crate::passes::material::MaterialPass;
use crate::passes::scatter::ScatterPass;
use crate::passes::shadow::ShadowVolumePass;
use crate::passes::temporal::{BlendTarget, TemporalBlendPass};
use crate::passes::uniforms::FroxelUniforms;
use crate::registry::FroxelRegistry;
use crate::settings::{FroxelSettings, GridSize};
use crate::volume::grid::VolumeGrid;

/// Everything the host hands over for one frame.
pub struct FrameInputs<'a> {
    pub camera: CameraState,
    /// Monotonic frame counter driving the jitter sequence.
    pub frame_index: u64,
    /// Elapsed time in seconds, for noise scrolling.
    pub time: f32,
    /// The host's scene depth buffer for this frame.
    pub depth: &'a wgpu::TextureView,
    /// The color target the composite draws over.
    pub target: &'a wgpu::TextureView,
    /// Shadow maps for lights that cast volumetric shadows this frame.
    /// Lights absent from the map leave their froxels fully lit.
    pub shadow_maps: FxHashMap<LightId, ShadowMapBinding<'a>>,
}

pub struct VolumetricRenderer {
    settings: FroxelSettings,
    grid: VolumeGrid,
    registry: FroxelRegistry,
    jitter: JitterSequence,
    shared: crate::passes::SharedBindings,
    froxel_buffer: wgpu::Buffer,
    froxel_bind_group: wgpu::BindGroup,

    init_pass: InitPass,
    shadow_pass: ShadowVolumePass,
    material_pass: MaterialPass,
    scatter_pass: ScatterPass,
    temporal_pass: TemporalBlendPass,
    accumulate_pass: AccumulatePass,
    composite_pass: CompositePass,

    prev_world_to_view: Mat4,
    frames_rendered: u64,
}

impl VolumetricRenderer {
    /// Device features the volume formats require: `r16float` and
    /// `rgba16float` are only read-write storage formats with
    /// adapter-specific format features enabled.
    pub const REQUIRED_FEATURES: wgpu::Features =
        wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES;

    /// Creates the renderer and allocates the volume grid.
    ///
    /// `target_format` is the format of the color target the composite pass
    /// will draw into.
    ///
    /// # Errors
    /// Returns [`FroxelError::MissingFeatures`] if the device was created
    /// without [`Self::REQUIRED_FEATURES`], [`FroxelError::InvalidSettings`]
    /// for out-of-range settings, and [`FroxelError::VolumeAllocation`] if
    /// the grid exceeds the device's 3D texture limit.
    pub fn new(
        device: &wgpu::Device,
        settings: FroxelSettings,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        if !device.features().contains(Self::REQUIRED_FEATURES) {
            return Err(FroxelError::MissingFeatures(Self::REQUIRED_FEATURES));
        }
        settings.validate()?;

        let grid = VolumeGrid::new(device, settings.grid)?;
        let shared = crate::passes::SharedBindings::new(device);

        let froxel_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Froxel Uniforms"),
            size: std::mem::size_of::<FroxelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let froxel_bind_group = Self::create_froxel_bind_group(device, &shared, &froxel_buffer);

        let init_pass = InitPass::new(device, &shared);
        let shadow_pass = ShadowVolumePass::new(device, &shared);
        let material_pass = MaterialPass::new(device, &shared);
        let scatter_pass = ScatterPass::new(device, &shared);
        let temporal_pass = TemporalBlendPass::new(device, &shared);
        let accumulate_pass = AccumulatePass::new(device, &shared);
        let composite_pass = CompositePass::new(device, &shared, target_format);

        info!(
            "volumetric renderer ready: grid {}x{}x{}, distance {}",
            settings.grid.width, settings.grid.height, settings.grid.depth, settings.volume_distance
        );

        Ok(Self {
            settings,
            grid,
            registry: FroxelRegistry::new(),
            jitter: JitterSequence::new(),
            shared,
            froxel_buffer,
            froxel_bind_group,
            init_pass,
            shadow_pass,
            material_pass,
            scatter_pass,
            temporal_pass,
            accumulate_pass,
            composite_pass,
            prev_world_to_view: Mat4::IDENTITY,
            frames_rendered: 0,
        })
    }

    fn create_froxel_bind_group(
        device: &wgpu::Device,
        shared: &crate::passes::SharedBindings,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Froxel Uniforms BindGroup"),
            layout: &shared.froxel_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    pub fn settings(&self) -> &FroxelSettings {
        &self.settings
    }

    pub fn registry(&self) -> &FroxelRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FroxelRegistry {
        &mut self.registry
    }

    /// Frames rendered since creation or the last grid resize.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Destroys all volume textures and allocates the grid at `size`.
    ///
    /// Consumes the renderer because the old volumes are destroyed before
    /// the new ones exist; an allocation failure leaves nothing to render
    /// with. History becomes meaningless across a resize, so the next frame
    /// blends as a first frame.
    ///
    /// # Errors
    /// Returns [`FroxelError::InvalidSettings`] for a degenerate size and
    /// [`FroxelError::VolumeAllocation`] if `size` exceeds the device's 3D
    /// texture limit.
    pub fn resize_grid(mut self, device: &wgpu::Device, size: GridSize) -> Result<Self> {
        let settings = FroxelSettings {
            grid: size,
            ..self.settings
        };
        settings.validate()?;
        self.grid = self.grid.reallocate(device, size)?;
        self.settings = settings;
        self.frames_rendered = 0;
        Ok(self)
    }

    fn build_uniforms(&self, frame: &FrameInputs<'_>) -> FroxelUniforms {
        let transform = FroxelTransform::new(&frame.camera, &self.settings);
        let grid = self.settings.grid;

        // History is garbage until one frame has been rendered; an alpha of
        // 1.0 makes the blend pass a plain copy of the current value.
        let alpha = if self.frames_rendered == 0 {
            1.0
        } else {
            self.settings.temporal_blend_alpha
        };

        let corners = frame.camera.screen_triangle_corners();
        let world_to_view = frame.camera.world_to_view();

        FroxelUniforms {
            view_to_world: frame.camera.view_to_world,
            world_to_view,
            prev_world_to_view: self.prev_world_to_view,
            froxel_params: transform.params(),
            grid_max: glam::Vec4::new(
                (grid.width - 1) as f32,
                (grid.height - 1) as f32,
                (grid.depth - 1) as f32,
                frame.camera.near,
            ),
            jitter: self.jitter.offset(frame.frame_index).extend(alpha),
            scene: glam::Vec4::new(
                self.settings.volume_distance,
                frame.time,
                frame.camera.far,
                self.settings.max_steps as f32,
            ),
            corner0: corners[0].extend(0.0),
            corner1: corners[1].extend(0.0),
            corner2: corners[2].extend(0.0),
        }
    }

    /// Records the whole volumetric frame into `encoder` and advances the
    /// temporal history.
    ///
    /// Call once per frame, after the host has rendered its depth buffer and
    /// any shadow maps referenced by `frame.shadow_maps`, and before the
    /// encoder is submitted.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &FrameInputs<'_>,
    ) {
        let uniforms = self.build_uniforms(frame);
        queue.write_buffer(&self.froxel_buffer, 0, bytemuck::bytes_of(&uniforms));

        let contributions = shadow_contributions(&self.registry, &frame.shadow_maps);

        self.shadow_pass.prepare(device, queue, &contributions);
        self.material_pass.prepare(device, queue, &self.registry);
        self.scatter_pass.prepare(device, queue, &self.registry);

        let volumes_bind_group = self.shared.create_volumes_bind_group(device, &self.grid);
        let grid_size = self.grid.size();

        self.init_pass
            .record(encoder, &self.froxel_bind_group, &volumes_bind_group, grid_size);

        for (slot, binding) in &contributions {
            self.shadow_pass.contribute(
                device,
                encoder,
                &self.froxel_bind_group,
                &self.grid,
                *slot,
                binding,
            );
        }
        self.temporal_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.grid,
            BlendTarget::Shadow,
        );

        self.material_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.registry,
            grid_size,
        );
        self.temporal_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.grid,
            BlendTarget::Material,
        );

        self.scatter_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.registry,
            grid_size,
        );
        self.temporal_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.grid,
            BlendTarget::Scatter,
        );

        self.accumulate_pass
            .record(encoder, &self.froxel_bind_group, &volumes_bind_group, grid_size);
        self.temporal_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &volumes_bind_group,
            &self.grid,
            BlendTarget::Accumulation,
        );

        self.composite_pass.record(
            device,
            encoder,
            &self.froxel_bind_group,
            &self.grid.accumulation.front().view,
            frame.depth,
            frame.target,
        );

        // This frame's blended volumes become next frame's history.
        self.grid.swap_history();
        self.prev_world_to_view = frame.camera.world_to_view();
        self.frames_rendered += 1;

        debug!(
            "volumetric frame {}: {} lights ({} shadowed), {} media",
            frame.frame_index,
            self.registry.light_count(),
            contributions.len(),
            self.registry.medium_count(),
        );
    }
}

/// Pairs each shadow-casting directional light with its shadow map for this
/// frame. Slots follow light registration order so the dynamic offsets stay
/// stable within the frame. Only directional lights contribute to the shadow
/// volume; a binding supplied for any other light kind is ignored.
fn shadow_contributions<'a, T>(
    registry: &FroxelRegistry,
    shadow_maps: &'a FxHashMap<LightId, T>,
) -> Vec<(u32, &'a T)> {
    registry
        .lights()
        .enumerate()
        .filter_map(|(index, (id, descriptor))| match descriptor.kind {
            LightKind::Directional { .. } => {
                shadow_maps.get(&id).map(|binding| (index as u32, binding))
            }
            LightKind::Unsupported(kind) => {
                if shadow_maps.contains_key(&id) {
                    debug!("skipping shadow map for unsupported light {id:?}: {kind:?}");
                }
                None
            }
        })
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
