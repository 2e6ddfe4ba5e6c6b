//! Error types for the Voxseg engine

use glam::{IVec3, UVec3};
use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("voxel coordinate {coord} outside volume extent {dims}")]
    OutOfBounds { coord: IVec3, dims: UVec3 },

    #[error("invalid stroke state: {0}")]
    InvalidState(&'static str),

    #[error("nothing to {0}")]
    EmptyHistory(&'static str),

    #[error("unknown segment id: {0}")]
    SegmentNotFound(String),

    #[error("mask extent {got} does not match volume extent {expected}")]
    MaskExtentMismatch { expected: UVec3, got: UVec3 },

    #[error("view is not registered: {0}")]
    ViewNotFound(String),
}
