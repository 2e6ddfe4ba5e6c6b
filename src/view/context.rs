//! Per-view transform state.

use std::fmt;

use crate::core::types::{Mat4, Vec2, Vec3};
use crate::math::Plane;

/// Identifier of a registered view
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of view a pointer event originates from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// 2D slice view; edits are constrained to the slice plane's voxel layer
    Slice,
    /// 3D view; edits use the full 3D brush footprint
    ThreeD,
}

/// Snapshot of a view's mapping between screen and world space.
///
/// The hosting application must keep this current (zoom, pan, slice
/// scrolling all change it); the editor re-reads it on every pointer
/// sample, so invariant brush sizing tracks zoom changes mid-stroke.
#[derive(Clone, Debug)]
pub struct ViewContext {
    pub kind: ViewKind,
    /// Display (pixel) coordinates to world transform
    pub view_to_world: Mat4,
    /// Cached inverse for projecting world points back to the screen
    pub world_to_view: Mat4,
    /// World length of one screen pixel at the current zoom
    pub mm_per_pixel: f32,
    /// Slice plane (2D views) or camera focal plane (3D views)
    pub plane: Plane,
}

impl ViewContext {
    /// Context for a 2D slice view
    pub fn slice(view_to_world: Mat4, mm_per_pixel: f32, plane: Plane) -> Self {
        Self {
            kind: ViewKind::Slice,
            world_to_view: view_to_world.inverse(),
            view_to_world,
            mm_per_pixel,
            plane,
        }
    }

    /// Context for a 3D view; `focal_plane` is where display points land in
    /// world space
    pub fn three_d(view_to_world: Mat4, mm_per_pixel: f32, focal_plane: Plane) -> Self {
        Self {
            kind: ViewKind::ThreeD,
            world_to_view: view_to_world.inverse(),
            view_to_world,
            mm_per_pixel,
            plane: focal_plane,
        }
    }

    /// World position of a display-space point
    pub fn display_to_world(&self, position: Vec2) -> Vec3 {
        self.view_to_world
            .transform_point3(Vec3::new(position.x, position.y, 0.0))
    }

    /// Display-space position of a world point
    pub fn world_to_display(&self, point: Vec3) -> Vec2 {
        let v = self.world_to_view.transform_point3(point);
        Vec2::new(v.x, v.y)
    }
}
