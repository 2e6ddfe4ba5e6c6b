//! Sparse voxel delta - one undoable unit of mask changes.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{IVec3, Label, UVec3};
use crate::math::VoxelBox;
use super::segment::SegmentId;

/// One changed voxel: linear index plus previous and new label.
/// Exactly 8 bytes so large strokes stay compact.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DeltaRecord {
    /// Linear voxel index (x fastest)
    pub index: u32,
    pub prev: Label,
    pub next: Label,
    _pad: [u8; 2],
}

impl DeltaRecord {
    pub fn new(index: u32, prev: Label, next: Label) -> Self {
        Self { index, prev, next, _pad: [0; 2] }
    }
}

/// A committed, immutable batch of voxel changes for one segment.
///
/// Records are sorted by index and hold both the pre-stroke and final
/// value of each touched voxel, so the delta can be applied forward or
/// inverted without a volume snapshot.
#[derive(Clone, Debug)]
pub struct MaskDelta {
    segment: SegmentId,
    records: Vec<DeltaRecord>,
    bounds: VoxelBox,
}

impl MaskDelta {
    /// Build a delta from raw records. Records are sorted, no-op entries
    /// (prev == next) dropped, and the affected voxel box computed from
    /// the grid dimensions.
    pub fn from_records(segment: SegmentId, mut records: Vec<DeltaRecord>, dims: UVec3) -> Self {
        records.retain(|r| r.prev != r.next);
        records.sort_unstable_by_key(|r| r.index);
        records.dedup_by_key(|r| r.index);

        let mut bounds = VoxelBox::EMPTY;
        for record in &records {
            bounds.expand(coord_of_index(record.index as usize, dims));
        }
        Self { segment, records, bounds }
    }

    /// Segment this delta belongs to
    pub fn segment(&self) -> &SegmentId {
        &self.segment
    }

    /// Changed voxels, sorted by index
    pub fn records(&self) -> &[DeltaRecord] {
        &self.records
    }

    /// Voxel box covering every changed voxel
    pub fn bounds(&self) -> VoxelBox {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn coord_of_index(index: usize, dims: UVec3) -> IVec3 {
    let x = index % dims.x as usize;
    let y = (index / dims.x as usize) % dims.y as usize;
    let z = index / (dims.x as usize * dims.y as usize);
    IVec3::new(x as i32, y as i32, z as i32)
}
