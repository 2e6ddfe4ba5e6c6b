//! Pointer events in and refresh requests out.

use crate::core::types::Vec2;
use crate::math::VoxelBox;
use crate::segmentation::segment::SegmentId;
use super::context::ViewId;

/// Phase of a pointer interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer sample dispatched by a view
#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// View the event originated from
    pub view: ViewId,
    /// Display-space position in pixels
    pub position: Vec2,
    pub kind: PointerEventKind,
    /// Stylus pressure if the device reports it
    pub pressure: Option<f32>,
}

impl PointerEvent {
    pub fn new(view: impl Into<ViewId>, position: Vec2, kind: PointerEventKind) -> Self {
        Self {
            view: view.into(),
            position,
            kind,
            pressure: None,
        }
    }
}

/// Fire-and-forget notification that a segment's voxels changed.
///
/// Bounds cover only the touched region so the rendering collaborator can
/// refresh incrementally instead of re-uploading the whole volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshRequest {
    pub segment: SegmentId,
    pub bounds: VoxelBox,
}
