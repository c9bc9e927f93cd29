//! Froxel-grid math: coordinate transforms, the temporal jitter sequence,
//! and CPU mirrors of the per-froxel kernel arithmetic.

pub mod integration;
pub mod jitter;
pub mod transform;

pub use jitter::JitterSequence;
pub use transform::FroxelTransform;
