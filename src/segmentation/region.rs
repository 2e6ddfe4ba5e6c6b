//! Region masks - spatial predicates constraining where edits may land.
//!
//! A region mask is declarative and composable; it is compiled once per
//! stroke against the current segment table so the per-voxel test is a
//! LUT/bit lookup, cheap enough to run for every voxel of every sample.

use std::sync::Arc;

use crate::core::error::Error;
use crate::core::types::{IVec3, Label, Result, UVec3};
use crate::math::VoxelBox;
use super::store::MaskStore;
use super::segment::SegmentId;

/// Which segments a segment-based region refers to
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SegmentSelection {
    /// Every segment in the segmentation
    #[default]
    All,
    /// Every currently visible segment
    AllVisible,
    /// An explicit list of segment ids
    Only(Vec<SegmentId>),
}

/// Caller-provided boolean volume restricting edits voxel by voxel.
/// Must match the mask store extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVolume {
    dims: UVec3,
    bits: Vec<u64>,
}

impl BitVolume {
    /// All-false volume of the given dimensions
    pub fn new(dims: UVec3) -> Self {
        let voxel_count = dims.x as usize * dims.y as usize * dims.z as usize;
        Self {
            dims,
            bits: vec![0; voxel_count.div_ceil(64)],
        }
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Set a voxel by linear index
    pub fn set_index(&mut self, index: usize, value: bool) {
        if value {
            self.bits[index / 64] |= 1 << (index % 64);
        } else {
            self.bits[index / 64] &= !(1 << (index % 64));
        }
    }

    /// Read a voxel by linear index
    pub fn get_index(&self, index: usize) -> bool {
        self.bits[index / 64] >> (index % 64) & 1 == 1
    }

    /// Set a voxel by coordinate (silently ignores out-of-bounds)
    pub fn set(&mut self, coord: IVec3, value: bool) {
        if VoxelBox::full(self.dims).contains(coord) {
            let index = coord.x as usize
                + self.dims.x as usize
                    * (coord.y as usize + self.dims.y as usize * coord.z as usize);
            self.set_index(index, value);
        }
    }
}

/// Spatial predicate over edit targets
#[derive(Clone, Debug, Default)]
pub enum RegionMask {
    /// No restriction (default)
    #[default]
    Everywhere,
    /// Only voxels currently inside the selected segments
    InsideSegments(SegmentSelection),
    /// Only voxels currently outside the selected segments
    OutsideSegments(SegmentSelection),
    /// Only voxels inside a fixed box
    WithinBox(VoxelBox),
    /// Only voxels set in an explicit boolean volume
    Explicit(Arc<BitVolume>),
    And(Box<RegionMask>, Box<RegionMask>),
    Or(Box<RegionMask>, Box<RegionMask>),
    Not(Box<RegionMask>),
}

impl RegionMask {
    /// Restrict edits to inside one segment
    pub fn inside(id: SegmentId) -> Self {
        RegionMask::InsideSegments(SegmentSelection::Only(vec![id]))
    }

    /// Restrict edits to outside all segments
    pub fn outside_all() -> Self {
        RegionMask::OutsideSegments(SegmentSelection::All)
    }

    /// Resolve segment selections against the current segment table.
    /// Fails if an explicit volume does not match the store extent or a
    /// selected segment no longer exists.
    pub fn compile(&self, store: &MaskStore) -> Result<CompiledRegion> {
        Ok(CompiledRegion {
            node: self.compile_node(store)?,
        })
    }

    fn compile_node(&self, store: &MaskStore) -> Result<CompiledNode> {
        Ok(match self {
            RegionMask::Everywhere => CompiledNode::Everywhere,
            RegionMask::InsideSegments(selection) => {
                CompiledNode::LabelIn(selection_lut(selection, store)?)
            }
            RegionMask::OutsideSegments(selection) => CompiledNode::Not(Box::new(
                CompiledNode::LabelIn(selection_lut(selection, store)?),
            )),
            RegionMask::WithinBox(bounds) => CompiledNode::WithinBox(*bounds),
            RegionMask::Explicit(volume) => {
                if volume.dims() != store.dims() {
                    return Err(Error::MaskExtentMismatch {
                        expected: store.dims(),
                        got: volume.dims(),
                    });
                }
                CompiledNode::Explicit(Arc::clone(volume))
            }
            RegionMask::And(a, b) => CompiledNode::And(
                Box::new(a.compile_node(store)?),
                Box::new(b.compile_node(store)?),
            ),
            RegionMask::Or(a, b) => CompiledNode::Or(
                Box::new(a.compile_node(store)?),
                Box::new(b.compile_node(store)?),
            ),
            RegionMask::Not(inner) => CompiledNode::Not(Box::new(inner.compile_node(store)?)),
        })
    }
}

fn selection_lut(selection: &SegmentSelection, store: &MaskStore) -> Result<[bool; 256]> {
    let mut lut = [false; 256];
    match selection {
        SegmentSelection::All => {
            for segment in store.segments() {
                lut[segment.label() as usize] = true;
            }
        }
        SegmentSelection::AllVisible => lut = store.visible_label_lut(),
        SegmentSelection::Only(ids) => {
            for id in ids {
                lut[store.label_value(id)? as usize] = true;
            }
        }
    }
    Ok(lut)
}

/// A region mask resolved against a snapshot of the segment table
#[derive(Clone, Debug)]
pub struct CompiledRegion {
    node: CompiledNode,
}

#[derive(Clone, Debug)]
enum CompiledNode {
    Everywhere,
    LabelIn([bool; 256]),
    WithinBox(VoxelBox),
    Explicit(Arc<BitVolume>),
    And(Box<CompiledNode>, Box<CompiledNode>),
    Or(Box<CompiledNode>, Box<CompiledNode>),
    Not(Box<CompiledNode>),
}

impl CompiledRegion {
    /// Whether an edit may touch the voxel. `label` is the voxel's current
    /// value; `index` its linear index.
    pub fn allows(&self, coord: IVec3, index: usize, label: Label) -> bool {
        self.node.allows(coord, index, label)
    }
}

impl CompiledNode {
    fn allows(&self, coord: IVec3, index: usize, label: Label) -> bool {
        match self {
            CompiledNode::Everywhere => true,
            CompiledNode::LabelIn(lut) => lut[label as usize],
            CompiledNode::WithinBox(bounds) => bounds.contains(coord),
            CompiledNode::Explicit(volume) => volume.get_index(index),
            CompiledNode::And(a, b) => {
                a.allows(coord, index, label) && b.allows(coord, index, label)
            }
            CompiledNode::Or(a, b) => {
                a.allows(coord, index, label) || b.allows(coord, index, label)
            }
            CompiledNode::Not(inner) => !inner.allows(coord, index, label),
        }
    }
}
