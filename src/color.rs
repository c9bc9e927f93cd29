//! Color and Coefficient Conversions
//!
//! Descriptor colors are authored in display space; the kernels work with
//! linear physical coefficients. Decoding uses a fixed 2.2 exponent rather
//! than the piecewise sRGB curve, and parity with that approximation matters:
//! white stays exactly white, mid-gray 0.5 lands at ~0.2176.
//!
//! The physical scales map authored [0,1] values to per-meter coefficients.

use glam::Vec3;

/// Scattering color -> scattering coefficient scale.
pub const SCATTER_SCALE: f32 = 0.006_92;
/// Absorption value -> absorption coefficient scale.
pub const ABSORPTION_SCALE: f32 = 0.000_77;

/// Fixed-exponent gamma decode, applied per channel.
#[must_use]
pub fn decode_gamma(color: Vec3) -> Vec3 {
    Vec3::new(
        color.x.powf(2.2),
        color.y.powf(2.2),
        color.z.powf(2.2),
    )
}

/// Linear light color uploaded to the in-scatter kernel.
///
/// Intensity is applied before the decode, matching the authored-color
/// convention of the scatter writer.
#[must_use]
pub fn light_linear_color(color: Vec3, intensity: f32) -> Vec3 {
    decode_gamma(color * intensity)
}

/// Physically scaled scattering coefficient from an authored color.
///
/// The raw channel values are used directly (no display-gamma decode): the
/// coefficients are numeric parameters, not colors on screen.
#[must_use]
pub fn scattering_coefficient(color: Vec3) -> Vec3 {
    color * SCATTER_SCALE
}

/// Physically scaled absorption coefficient from an authored [0,1] value.
#[must_use]
pub fn absorption_coefficient(absorption: f32) -> f32 {
    absorption * ABSORPTION_SCALE
}
