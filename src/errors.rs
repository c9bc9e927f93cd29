//! Error Types
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, FroxelError>`.
//!
//! The taxonomy is deliberately small: volume allocation and device capability
//! problems are fatal for the effect (the host should disable it for the
//! affected camera), invalid settings are rejected up front, and everything
//! else degrades silently at runtime (missing shadow maps, unsupported
//! descriptor variants) without surfacing an error.

use thiserror::Error;

use crate::settings::GridSize;

/// The main error type for the froxel subsystem.
#[derive(Error, Debug)]
pub enum FroxelError {
    /// A froxel volume could not be allocated on the device.
    ///
    /// Fatal for the effect: the host must disable volumetric rendering for
    /// this camera rather than run with a partial volume set.
    #[error(
        "failed to allocate volume `{label}` ({}x{}x{}): exceeds device 3D texture limit {limit}",
        .size.width, .size.height, .size.depth
    )]
    VolumeAllocation {
        label: &'static str,
        size: GridSize,
        limit: u32,
    },

    /// The device is missing features the volume pipelines require.
    #[error("device is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    /// A tunable parameter is outside its valid range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FroxelError>;
