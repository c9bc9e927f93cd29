//! GPU Smoke Tests
//!
//! End-to-end construction against a real device: volume allocation,
//! pipeline creation, and one recorded frame. Skipped cleanly on machines
//! without a capable adapter so the suite stays runnable in CI.

use glam::Vec3;

use froxel::{
    CameraState, FrameInputs, FroxelSettings, GridSize, LightDescriptor, LightId, LightKind,
    MediumDescriptor, MediumId, MediumKind, UnsupportedLight, UnsupportedMedium,
    VolumetricRenderer,
};

fn request_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let _ = env_logger::builder().is_test(true).try_init();

    let instance = wgpu::Instance::default();
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;

    if !adapter
        .features()
        .contains(VolumetricRenderer::REQUIRED_FEATURES)
    {
        eprintln!("skipping: adapter lacks required features");
        return None;
    }

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: None,
        required_features: VolumetricRenderer::REQUIRED_FEATURES,
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::Performance,
        ..Default::default()
    }))
    .ok()
}

fn test_camera() -> CameraState {
    CameraState::look_at(
        Vec3::new(0.0, 2.0, 8.0),
        Vec3::ZERO,
        Vec3::Y,
        std::f32::consts::FRAC_PI_3,
        16.0 / 9.0,
        0.1,
        500.0,
    )
}

fn frame_texture(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: None,
        size: wgpu::Extent3d {
            width: 64,
            height: 36,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

#[test]
fn renderer_construction_allocates_volumes() {
    let Some((device, _queue)) = request_device() else {
        return;
    };
    let renderer = VolumetricRenderer::new(
        &device,
        FroxelSettings::default(),
        wgpu::TextureFormat::Rgba16Float,
    )
    .expect("renderer construction failed");
    assert_eq!(renderer.frames_rendered(), 0);
}

#[test]
fn oversized_grid_is_rejected_not_fatal() {
    let Some((device, _queue)) = request_device() else {
        return;
    };
    let settings = FroxelSettings {
        grid: GridSize::new(1 << 20, 88, 64),
        ..Default::default()
    };
    assert!(VolumetricRenderer::new(&device, settings, wgpu::TextureFormat::Rgba16Float).is_err());
}

#[test]
fn two_frames_record_without_validation_errors() {
    let Some((device, queue)) = request_device() else {
        return;
    };
    let mut renderer = VolumetricRenderer::new(
        &device,
        FroxelSettings {
            grid: GridSize::new(40, 22, 16),
            ..Default::default()
        },
        wgpu::TextureFormat::Rgba16Float,
    )
    .expect("renderer construction failed");

    renderer.registry_mut().register_light(
        LightId::generate(),
        LightDescriptor::directional(Vec3::new(-0.3, -1.0, 0.2), Vec3::ONE, 2.0),
    );
    renderer.registry_mut().register_medium(
        MediumId::generate(),
        MediumDescriptor::constant(Vec3::splat(0.6), 0.2, 0.5),
    );
    // Unsupported descriptors must record as no-ops, not validation errors.
    renderer.registry_mut().register_light(
        LightId::generate(),
        LightDescriptor {
            kind: LightKind::Unsupported(UnsupportedLight::Point),
            color: Vec3::ONE,
            intensity: 5.0,
        },
    );
    renderer.registry_mut().register_medium(
        MediumId::generate(),
        MediumDescriptor {
            kind: MediumKind::Unsupported(UnsupportedMedium::Box),
            scattering_color: Vec3::splat(0.4),
            absorption: 0.1,
            phase_g: 0.0,
            noise: None,
        },
    );

    let color = frame_texture(&device, wgpu::TextureFormat::Rgba16Float);
    let depth = frame_texture(&device, wgpu::TextureFormat::Depth32Float);
    let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
    let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

    for frame_index in 0..2u64 {
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        renderer.render(
            &device,
            &queue,
            &mut encoder,
            &FrameInputs {
                camera: test_camera(),
                frame_index,
                time: frame_index as f32 / 60.0,
                depth: &depth_view,
                target: &color_view,
                shadow_maps: rustc_hash::FxHashMap::default(),
            },
        );
        queue.submit([encoder.finish()]);
    }
    device.poll(wgpu::PollType::wait_indefinitely()).expect("device poll failed");
    assert_eq!(renderer.frames_rendered(), 2);
}
