//! Volume description consumed by the editing core

pub mod geometry;

pub use geometry::VolumeGeometry;
