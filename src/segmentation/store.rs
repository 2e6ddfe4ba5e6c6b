//! Voxel mask store - the single source of truth for segment labels.
//!
//! All segments of a segmentation share one label-valued buffer: each voxel
//! holds the label of the segment covering it, 0 for background. Segments
//! therefore never overlap; which incumbent labels a paint operation may
//! replace is decided by [`OverwritePolicy`] at effect level, not here.
//!
//! The store is a pure state container. Brush, effect and history logic
//! live in their own modules and mutate the store only through
//! [`set_label`](MaskStore::set_label) and delta application.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{BACKGROUND, IVec3, Label, Result, UVec3};
use crate::math::VoxelBox;
use super::delta::MaskDelta;
use super::segment::{Segment, SegmentId};

/// Which incumbent labels a paint operation may replace
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Painted voxels are taken from every other segment (mutually
    /// exclusive labels; the default)
    #[default]
    AllSegments,
    /// Painted voxels are taken only from visible segments; hidden
    /// segments keep their voxels
    VisibleSegments,
    /// Only background voxels are painted; existing labels always win
    Never,
}

/// Labeled voxel buffer plus the ordered segment table.
#[derive(Clone, Debug)]
pub struct MaskStore {
    dims: UVec3,
    labels: Vec<Label>,
    /// Segments in insertion order (display stacking order)
    segments: Vec<Segment>,
    next_label: Label,
}

impl MaskStore {
    /// Create an empty store with the given grid dimensions (all background)
    pub fn new(dims: UVec3) -> Self {
        let voxel_count = dims.x as usize * dims.y as usize * dims.z as usize;
        Self {
            dims,
            labels: vec![BACKGROUND; voxel_count],
            segments: Vec::new(),
            next_label: 1,
        }
    }

    /// Grid dimensions
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Linear index of a voxel coordinate, x fastest
    pub fn voxel_index(&self, coord: IVec3) -> Result<usize> {
        if !VoxelBox::full(self.dims).contains(coord) {
            return Err(Error::OutOfBounds { coord, dims: self.dims });
        }
        Ok(coord.x as usize
            + self.dims.x as usize * (coord.y as usize + self.dims.y as usize * coord.z as usize))
    }

    /// Voxel coordinate of a linear index
    pub fn coord_of_index(&self, index: usize) -> IVec3 {
        let x = index % self.dims.x as usize;
        let y = (index / self.dims.x as usize) % self.dims.y as usize;
        let z = index / (self.dims.x as usize * self.dims.y as usize);
        IVec3::new(x as i32, y as i32, z as i32)
    }

    /// Label at a voxel coordinate
    pub fn label_at(&self, coord: IVec3) -> Result<Label> {
        Ok(self.labels[self.voxel_index(coord)?])
    }

    /// Label at a linear index (index must come from `voxel_index`)
    pub fn label_at_index(&self, index: usize) -> Label {
        self.labels[index]
    }

    /// Set the label at a voxel coordinate, returning the previous value
    pub fn set_label(&mut self, coord: IVec3, label: Label) -> Result<Label> {
        let index = self.voxel_index(coord)?;
        Ok(std::mem::replace(&mut self.labels[index], label))
    }

    pub(crate) fn set_label_at_index(&mut self, index: usize, label: Label) -> Label {
        std::mem::replace(&mut self.labels[index], label)
    }

    /// Full label buffer, x fastest
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label buffer as raw bytes for upload by the rendering collaborator
    pub fn labels_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.labels)
    }

    /// Apply a delta forward (index -> new label). Validates every record
    /// before writing so the mutation is all-or-nothing.
    pub fn apply(&mut self, delta: &MaskDelta) -> Result<()> {
        self.check_delta(delta)?;
        for record in delta.records() {
            self.labels[record.index as usize] = record.next;
        }
        Ok(())
    }

    /// Apply a delta's inverse (index -> previous label)
    pub fn revert(&mut self, delta: &MaskDelta) -> Result<()> {
        self.check_delta(delta)?;
        for record in delta.records() {
            self.labels[record.index as usize] = record.prev;
        }
        Ok(())
    }

    fn check_delta(&self, delta: &MaskDelta) -> Result<()> {
        for record in delta.records() {
            if record.index as usize >= self.labels.len() {
                return Err(Error::OutOfBounds {
                    coord: self.coord_of_index(record.index as usize),
                    dims: self.dims,
                });
            }
        }
        Ok(())
    }

    // -- segment table -----------------------------------------------------

    /// Add a segment, allocating the next free label value
    pub fn add_segment(&mut self, name: &str, color: [u8; 3]) -> Result<SegmentId> {
        if self.next_label == Label::MAX {
            return Err(Error::InvalidState("label values exhausted"));
        }
        let label = self.next_label;
        self.next_label += 1;

        let id = SegmentId::new(format!("segment_{label}"));
        self.segments.push(Segment::new(id.clone(), name, color, label));
        log::debug!("added segment {id} ({name}) with label {label}");
        Ok(id)
    }

    /// Remove a segment, clearing its voxels to background. Returns the
    /// voxel box that was cleared so views can refresh it.
    pub fn remove_segment(&mut self, id: &SegmentId) -> Result<VoxelBox> {
        let position = self
            .segments
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| Error::SegmentNotFound(id.to_string()))?;
        let label = self.segments[position].label();
        self.segments.remove(position);

        let mut cleared = VoxelBox::EMPTY;
        for index in 0..self.labels.len() {
            if self.labels[index] == label {
                self.labels[index] = BACKGROUND;
                cleared.expand(self.coord_of_index(index));
            }
        }
        log::debug!("removed segment {id}; cleared label {label}");
        Ok(cleared)
    }

    /// Segments in insertion order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment ids in insertion order
    pub fn segment_ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.segments.iter().map(|s| s.id())
    }

    /// Look up a segment
    pub fn segment(&self, id: &SegmentId) -> Result<&Segment> {
        self.segments
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| Error::SegmentNotFound(id.to_string()))
    }

    /// Label value of a segment
    pub fn label_value(&self, id: &SegmentId) -> Result<Label> {
        Ok(self.segment(id)?.label())
    }

    /// Toggle a segment's visibility
    pub fn set_segment_visible(&mut self, id: &SegmentId, visible: bool) -> Result<()> {
        let segment = self
            .segments
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| Error::SegmentNotFound(id.to_string()))?;
        segment.visible = visible;
        Ok(())
    }

    /// Number of voxels currently labeled with a segment's value
    pub fn segment_voxel_count(&self, id: &SegmentId) -> Result<usize> {
        let label = self.label_value(id)?;
        Ok(self.labels.iter().filter(|&&v| v == label).count())
    }

    /// Per-label lookup table: true where the label belongs to a currently
    /// visible segment
    pub fn visible_label_lut(&self) -> [bool; 256] {
        let mut lut = [false; 256];
        for segment in &self.segments {
            if segment.visible {
                lut[segment.label() as usize] = true;
            }
        }
        lut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_store() -> MaskStore {
        MaskStore::new(UVec3::new(4, 4, 4))
    }

    #[test]
    fn test_set_and_get_label() {
        let mut store = small_store();
        let coord = IVec3::new(1, 2, 3);
        assert_eq!(store.label_at(coord).unwrap(), BACKGROUND);

        let prev = store.set_label(coord, 7).unwrap();
        assert_eq!(prev, BACKGROUND);
        assert_eq!(store.label_at(coord).unwrap(), 7);

        let prev = store.set_label(coord, 2).unwrap();
        assert_eq!(prev, 7);
    }

    #[test]
    fn test_out_of_bounds() {
        let store = small_store();
        assert!(matches!(
            store.label_at(IVec3::new(4, 0, 0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            store.label_at(IVec3::new(0, -1, 0)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_index_roundtrip() {
        let store = small_store();
        for coord in VoxelBox::full(store.dims()).iter() {
            let index = store.voxel_index(coord).unwrap();
            assert_eq!(store.coord_of_index(index), coord);
        }
    }

    #[test]
    fn test_add_and_remove_segment() {
        let mut store = small_store();
        let a = store.add_segment("a", [255, 0, 0]).unwrap();
        let b = store.add_segment("b", [0, 255, 0]).unwrap();
        assert_eq!(store.label_value(&a).unwrap(), 1);
        assert_eq!(store.label_value(&b).unwrap(), 2);
        assert_eq!(store.segments().len(), 2);

        store.set_label(IVec3::ZERO, 1).unwrap();
        store.set_label(IVec3::ONE, 1).unwrap();
        let cleared = store.remove_segment(&a).unwrap();
        assert_eq!(cleared, VoxelBox::new(IVec3::ZERO, IVec3::ONE));
        assert_eq!(store.label_at(IVec3::ZERO).unwrap(), BACKGROUND);
        assert!(store.segment(&a).is_err());

        // label values are not reused
        let c = store.add_segment("c", [0, 0, 255]).unwrap();
        assert_eq!(store.label_value(&c).unwrap(), 3);
    }

    #[test]
    fn test_segment_not_found() {
        let store = small_store();
        assert!(matches!(
            store.segment(&SegmentId::from("nope")),
            Err(Error::SegmentNotFound(_))
        ));
    }

    #[test]
    fn test_visible_label_lut() {
        let mut store = small_store();
        let a = store.add_segment("a", [255, 0, 0]).unwrap();
        let b = store.add_segment("b", [0, 255, 0]).unwrap();
        store.set_segment_visible(&b, false).unwrap();

        let lut = store.visible_label_lut();
        assert!(lut[store.label_value(&a).unwrap() as usize]);
        assert!(!lut[store.label_value(&b).unwrap() as usize]);
    }

    #[test]
    fn test_delta_application_is_atomic() {
        use crate::segmentation::delta::{DeltaRecord, MaskDelta};

        let mut store = small_store();
        // second record points outside this store's buffer
        let delta = MaskDelta::from_records(
            SegmentId::from("segment_1"),
            vec![DeltaRecord::new(0, 0, 1), DeltaRecord::new(1000, 0, 1)],
            UVec3::splat(16),
        );

        assert!(matches!(store.apply(&delta), Err(Error::OutOfBounds { .. })));
        // nothing was written, not even the valid record
        assert!(store.labels().iter().all(|&l| l == BACKGROUND));
        assert!(matches!(store.revert(&delta), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_labels_bytes() {
        let mut store = small_store();
        store.set_label(IVec3::ZERO, 9).unwrap();
        assert_eq!(store.labels_bytes().len(), 64);
        assert_eq!(store.labels_bytes()[0], 9);
    }
}
