//! Scattering Math Tests
//!
//! Tests for:
//! - Henyey-Greenstein phase function behavior
//! - Extinction and in-scatter contribution terms
//! - Temporal blending including the first-frame case
//! - Column accumulation and final composite blending
//! - Color decode and physical coefficient scaling

use glam::{Vec3, Vec4};

use froxel::color;
use froxel::froxel::FroxelTransform;
use froxel::froxel::integration::*;
use froxel::GridSize;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn reference_transform() -> FroxelTransform {
    FroxelTransform::from_parts(
        std::f32::consts::FRAC_PI_3,
        16.0 / 9.0,
        0.1,
        100.0,
        0.5,
        GridSize::default(),
    )
}

// ============================================================================
// Phase Function Tests
// ============================================================================

#[test]
fn isotropic_phase_is_inverse_four_pi() {
    let expected = 1.0 / (4.0 * std::f32::consts::PI);
    for cos_theta in [-1.0, -0.3, 0.0, 0.7, 1.0] {
        assert!(
            approx(henyey_greenstein(0.0, cos_theta), expected),
            "g=0 must be direction independent at cos={cos_theta}"
        );
    }
}

#[test]
fn forward_scattering_peaks_forward() {
    let forward = henyey_greenstein(0.7, 1.0);
    let side = henyey_greenstein(0.7, 0.0);
    let backward = henyey_greenstein(0.7, -1.0);
    assert!(forward > side && side > backward);
}

#[test]
fn phase_is_finite_at_the_singular_angle() {
    // g -> 1 with cos_theta = 1 drives the denominator to zero; the clamp
    // keeps the value finite.
    let value = henyey_greenstein(0.9999, 1.0);
    assert!(value.is_finite() && value > 0.0);
}

#[test]
fn phase_integrates_to_one_over_the_sphere() {
    // Midpoint rule over cos_theta; the phase function is azimuthally
    // symmetric so the solid-angle weight is 2*pi per unit of cos_theta.
    let n = 4096;
    for g in [0.0, 0.3, 0.8] {
        let mut sum = 0.0;
        for i in 0..n {
            let cos_theta = -1.0 + (i as f32 + 0.5) * 2.0 / n as f32;
            sum += henyey_greenstein(g, cos_theta) * 2.0 * std::f32::consts::PI * (2.0 / n as f32);
        }
        assert!(
            (sum - 1.0).abs() < 1e-2,
            "phase with g={g} integrates to {sum}"
        );
    }
}

// ============================================================================
// Extinction and Contribution Tests
// ============================================================================

#[test]
fn extinction_adds_absorption_and_mean_scattering() {
    let material = Vec4::new(0.3, 0.6, 0.9, 0.2);
    assert!(approx(extinction(material), 0.2 + 0.6));
}

#[test]
fn scatter_contribution_scales_with_visibility() {
    let material = Vec4::new(0.5, 0.5, 0.5, 0.1);
    let lit = scatter_contribution(material, 0.0, 1.0, Vec3::ONE, Vec3::NEG_Y, Vec3::NEG_Z);
    let shadowed = scatter_contribution(material, 0.0, 0.25, Vec3::ONE, Vec3::NEG_Y, Vec3::NEG_Z);

    assert!(approx(shadowed.x, lit.x * 0.25));
    assert!(
        approx(shadowed.w, lit.w),
        "extinction must not depend on visibility"
    );
}

#[test]
fn scatter_contributions_are_additive() {
    let material = Vec4::new(0.4, 0.4, 0.4, 0.05);
    let view = Vec3::NEG_Z;
    let lights = [
        (1.0, Vec3::new(1.0, 0.8, 0.6), Vec3::NEG_Y),
        (0.5, Vec3::new(0.2, 0.3, 0.9), Vec3::X),
    ];

    // Mirror the scatter writer: each light's dispatch loads the texel,
    // adds its contribution, and stores the result.
    let mut texel = Vec4::ZERO;
    for (visibility, color, direction) in lights {
        let loaded = texel;
        texel = loaded + scatter_contribution(material, 0.3, visibility, color, direction, view);
    }

    let a = scatter_contribution(material, 0.3, lights[0].0, lights[0].1, lights[0].2, view);
    let b = scatter_contribution(material, 0.3, lights[1].0, lights[1].1, lights[1].2, view);
    assert!(approx(texel.x, a.x + b.x));
    assert!(approx(texel.w, a.w + b.w));

    // Load-add-store must not care which light lands first.
    let mut reversed = Vec4::ZERO;
    for (visibility, color, direction) in lights.into_iter().rev() {
        reversed += scatter_contribution(material, 0.3, visibility, color, direction, view);
    }
    assert_eq!(texel, reversed);
}

#[test]
fn fully_shadowed_froxel_scatters_nothing() {
    let material = Vec4::new(0.5, 0.5, 0.5, 0.1);
    let dark = scatter_contribution(material, 0.5, 0.0, Vec3::ONE, Vec3::NEG_Y, Vec3::NEG_Z);
    assert_eq!(dark.truncate(), Vec3::ZERO);
}

// ============================================================================
// Temporal Blend Tests
// ============================================================================

#[test]
fn blend_with_unit_alpha_copies_current() {
    // First frame: history is garbage and alpha is forced to 1.
    let previous = Vec4::new(9.0, 9.0, 9.0, 9.0);
    let current = Vec4::new(0.25, 0.5, 0.75, 1.0);
    assert_eq!(temporal_blend(previous, current, 1.0), current);
}

#[test]
fn blend_with_default_alpha_converges_to_current() {
    let target = Vec4::new(1.0, 0.5, 0.25, 0.8);
    let mut value = Vec4::ZERO;
    for _ in 0..200 {
        value = temporal_blend(value, target, 1.0 / 7.0);
    }
    assert!((value - target).length() < 1e-3, "history never converged: {value:?}");
}

#[test]
fn blend_weight_matches_lerp() {
    let previous = Vec4::splat(1.0);
    let current = Vec4::splat(0.0);
    let blended = temporal_blend(previous, current, 1.0 / 7.0);
    assert!(approx(blended.x, 6.0 / 7.0));
}

// ============================================================================
// Accumulation Tests
// ============================================================================

#[test]
fn empty_column_keeps_full_transmittance() {
    let t = reference_transform();
    let scatter = vec![Vec4::ZERO; t.grid().depth as usize];
    let column = accumulate_column(&scatter, &t);
    for (z, sample) in column.iter().enumerate() {
        assert!(approx(sample.w, 1.0), "slice {z} lost transmittance in vacuum");
        assert_eq!(sample.truncate(), Vec3::ZERO);
    }
}

#[test]
fn transmittance_decreases_monotonically_in_fog() {
    let t = reference_transform();
    let scatter = vec![Vec4::new(0.01, 0.01, 0.01, 0.02); t.grid().depth as usize];
    let column = accumulate_column(&scatter, &t);

    let mut prev = 1.0;
    for (z, sample) in column.iter().enumerate() {
        assert!(
            sample.w < prev,
            "transmittance must fall every slice, slice {z}: {} >= {prev}",
            sample.w
        );
        assert!(sample.w > 0.0);
        prev = sample.w;
    }
}

#[test]
fn radiance_increases_monotonically_in_fog() {
    let t = reference_transform();
    let scatter = vec![Vec4::new(0.01, 0.01, 0.01, 0.02); t.grid().depth as usize];
    let column = accumulate_column(&scatter, &t);

    let mut prev = 0.0;
    for sample in &column {
        assert!(sample.x >= prev);
        prev = sample.x;
    }
}

#[test]
fn uniform_fog_transmittance_matches_beer_lambert() {
    let t = reference_transform();
    let sigma_t = 0.02;
    let scatter = vec![Vec4::new(0.0, 0.0, 0.0, sigma_t); t.grid().depth as usize];
    let column = accumulate_column(&scatter, &t);

    // Per-slice thicknesses sum to the volume extent, so the final
    // transmittance is exp(-sigma_t * (volume_distance - near)).
    let expected = (-sigma_t * (100.0 - 0.1)).exp();
    let last = column.last().unwrap().w;
    assert!(
        (last - expected).abs() < 1e-3,
        "expected {expected}, got {last}"
    );
}

#[test]
fn composite_attenuates_scene_and_adds_radiance() {
    let scene = Vec3::new(0.8, 0.4, 0.2);
    let accumulated = Vec4::new(0.1, 0.1, 0.1, 0.5);
    let out = composite_over(scene, accumulated);
    assert!(approx(out.x, 0.8 * 0.5 + 0.1));
    assert!(approx(out.z, 0.2 * 0.5 + 0.1));
}

#[test]
fn composite_with_full_transmittance_is_identity() {
    let scene = Vec3::new(0.3, 0.6, 0.9);
    assert_eq!(composite_over(scene, Vec4::new(0.0, 0.0, 0.0, 1.0)), scene);
}

// ============================================================================
// Color Tests
// ============================================================================

#[test]
fn gamma_decode_fixes_white_and_black() {
    assert_eq!(color::decode_gamma(Vec3::ONE), Vec3::ONE);
    assert_eq!(color::decode_gamma(Vec3::ZERO), Vec3::ZERO);
}

#[test]
fn gamma_decode_of_mid_gray() {
    let gray = color::decode_gamma(Vec3::splat(0.5));
    assert!(
        (gray.x - 0.217_637).abs() < 1e-4,
        "0.5^2.2 should be ~0.2176, got {}",
        gray.x
    );
}

#[test]
fn light_color_applies_intensity_before_decode() {
    let linear = color::light_linear_color(Vec3::splat(0.5), 2.0);
    // 0.5 * 2 = 1.0, decoded white.
    assert_eq!(linear, Vec3::ONE);
}

#[test]
fn physical_coefficients_are_linear_in_their_inputs() {
    let full = color::scattering_coefficient(Vec3::ONE);
    let half = color::scattering_coefficient(Vec3::splat(0.5));
    assert!(approx(half.x * 2.0, full.x));
    assert!(approx(full.x, color::SCATTER_SCALE));
    assert!(approx(
        color::absorption_coefficient(1.0),
        color::ABSORPTION_SCALE
    ));
}
