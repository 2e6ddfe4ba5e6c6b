//! Brush geometry.
//!
//! Computes, per view and per sizing mode, the set of voxels a pointer
//! sample affects. Pure functions; nothing here touches the mask store.

pub mod footprint;

use serde::{Deserialize, Serialize};

pub use footprint::{footprint, path_footprint, world_diameter};

/// Brush footprint shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushShape {
    /// Solid ball (full 3D footprint in 3D views)
    #[default]
    Sphere,
    /// Flat circle in the view plane, one voxel layer thick
    Disc,
    /// Flat square in the view plane, one voxel layer thick
    Square,
}

/// How the brush diameter is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// Diameter is a fixed physical length (mm), independent of zoom
    Absolute,
    /// Diameter is fixed in screen pixels; the world-space size is derived
    /// from the view's current pixel scale on every sample (default)
    #[default]
    Invariant,
}

/// Brush parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub shape: BrushShape,
    pub sizing: SizingMode,
    /// Diameter in mm (absolute) or pixels (invariant)
    pub diameter: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            shape: BrushShape::Sphere,
            sizing: SizingMode::Invariant,
            diameter: 24.0,
        }
    }
}
