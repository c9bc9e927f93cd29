//! GPU-resident froxel volumes: allocation and the double-buffered grid.

pub mod grid;
pub mod texture;

pub use grid::{DoubleBuffered, VolumeGrid};
pub use texture::VolumeTexture;
