//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3, Vec4,
    Mat3, Mat4,
    IVec3, UVec3,
};

/// Label value stored per voxel in a segmentation mask. 0 = background.
pub type Label = u8;

/// The unlabeled (background) value
pub const BACKGROUND: Label = 0;

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
