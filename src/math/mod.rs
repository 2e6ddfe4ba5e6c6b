//! Mathematical utilities and data structures

pub mod aabb;
pub mod voxel_box;
pub mod plane;

pub use aabb::Aabb;
pub use voxel_box::VoxelBox;
pub use plane::Plane;
