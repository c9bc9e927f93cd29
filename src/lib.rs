#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Froxel-based volumetric fog and light scattering for wgpu renderers.
//!
//! The effect voxelizes the camera frustum into a low-resolution 3D grid
//! ("froxels"), evaluates participating media and directional-light
//! in-scattering per cell, integrates along depth, and composites the result
//! over the host's color target. Sub-froxel detail is recovered over time by
//! jittering the sample position each frame and blending against reprojected
//! history.
//!
//! The host renderer keeps ownership of the device, queue, depth buffer, and
//! shadow maps; [`VolumetricRenderer::render`] records the whole effect into
//! a host-provided command encoder.

pub mod camera;
pub mod color;
pub mod errors;
pub mod froxel;
pub mod light;
pub mod media;
pub(crate) mod passes;
pub mod registry;
pub mod renderer;
pub mod settings;
pub mod volume;

pub use camera::CameraState;
pub use errors::{FroxelError, Result};
pub use froxel::{FroxelTransform, JitterSequence};
pub use light::{LightDescriptor, LightId, LightKind, ShadowMapBinding, UnsupportedLight};
pub use media::{MediumDescriptor, MediumId, MediumKind, NoiseParams, UnsupportedMedium};
pub use registry::FroxelRegistry;
pub use renderer::{FrameInputs, VolumetricRenderer};
pub use settings::{FroxelSettings, GridSize};
pub use volume::VolumeGrid;
