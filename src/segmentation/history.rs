//! Bounded undo/redo history of mask deltas.

use std::collections::VecDeque;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::VoxelBox;
use super::delta::MaskDelta;
use super::segment::SegmentId;
use super::store::MaskStore;

/// Linear undo/redo history. Committing while not at the top of history
/// discards the redo branch; exceeding the depth bound evicts the oldest
/// delta, which then becomes permanently unrecoverable.
#[derive(Debug, Default)]
pub struct UndoStack {
    undo: VecDeque<MaskDelta>,
    redo: Vec<MaskDelta>,
    depth: usize,
}

impl UndoStack {
    /// Create a history bounded to `depth` entries (minimum 1)
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Apply a delta to the store and push it as one undoable unit.
    /// Clears the redo history. Returns the affected voxel box.
    pub fn commit(&mut self, store: &mut MaskStore, delta: MaskDelta) -> Result<VoxelBox> {
        let bounds = delta.bounds();
        store.apply(&delta)?;

        self.redo.clear();
        self.undo.push_back(delta);
        if self.undo.len() > self.depth
            && let Some(evicted) = self.undo.pop_front()
        {
            log::warn!(
                "history depth {} exceeded; evicted edit of {} voxels on {} (unrecoverable)",
                self.depth,
                evicted.len(),
                evicted.segment(),
            );
        }
        log::debug!("committed edit; history {}/{}", self.undo.len(), self.depth);
        Ok(bounds)
    }

    /// Revert the most recent delta. Returns the affected voxel box.
    pub fn undo(&mut self, store: &mut MaskStore) -> Result<(SegmentId, VoxelBox)> {
        let delta = self
            .undo
            .pop_back()
            .ok_or(Error::EmptyHistory("undo"))?;
        store.revert(&delta)?;
        let result = (delta.segment().clone(), delta.bounds());
        self.redo.push(delta);
        Ok(result)
    }

    /// Reapply the most recently undone delta
    pub fn redo(&mut self, store: &mut MaskStore) -> Result<(SegmentId, VoxelBox)> {
        let delta = self.redo.pop().ok_or(Error::EmptyHistory("redo"))?;
        store.apply(&delta)?;
        let result = (delta.segment().clone(), delta.bounds());
        self.undo.push_back(delta);
        Ok(result)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop the whole history
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Drop every delta referencing a destroyed segment from both stacks
    pub fn prune_segment(&mut self, id: &SegmentId) {
        let before = self.undo.len() + self.redo.len();
        self.undo.retain(|d| d.segment() != id);
        self.redo.retain(|d| d.segment() != id);
        let dropped = before - self.undo.len() - self.redo.len();
        if dropped > 0 {
            log::debug!("pruned {dropped} history entries for removed segment {id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec3, UVec3};
    use crate::segmentation::delta::DeltaRecord;

    fn delta_for(store: &MaskStore, segment: &SegmentId, index: u32, next: u8) -> MaskDelta {
        MaskDelta::from_records(
            segment.clone(),
            vec![DeltaRecord::new(index, store.label_at_index(index as usize), next)],
            store.dims(),
        )
    }

    fn setup() -> (MaskStore, SegmentId) {
        let mut store = MaskStore::new(UVec3::splat(4));
        let id = store.add_segment("a", [255, 0, 0]).unwrap();
        (store, id)
    }

    #[test]
    fn test_commit_undo_redo_roundtrip() {
        let (mut store, id) = setup();
        let mut history = UndoStack::new(20);

        let delta = delta_for(&store, &id, 0, 1);
        history.commit(&mut store, delta).unwrap();
        assert_eq!(store.label_at(IVec3::ZERO).unwrap(), 1);

        history.undo(&mut store).unwrap();
        assert_eq!(store.label_at(IVec3::ZERO).unwrap(), 0);

        history.redo(&mut store).unwrap();
        assert_eq!(store.label_at(IVec3::ZERO).unwrap(), 1);
    }

    #[test]
    fn test_sequence_roundtrip_law() {
        let (mut store, id) = setup();
        let mut history = UndoStack::new(20);
        let pristine = store.labels().to_vec();

        for i in 0..5u32 {
            let delta = delta_for(&store, &id, i, 1);
            history.commit(&mut store, delta).unwrap();
        }
        for _ in 0..5 {
            history.undo(&mut store).unwrap();
        }
        assert_eq!(store.labels(), &pristine[..]);
    }

    #[test]
    fn test_empty_history_errors() {
        let (mut store, _) = setup();
        let mut history = UndoStack::new(20);
        assert!(matches!(history.undo(&mut store), Err(Error::EmptyHistory("undo"))));
        assert!(matches!(history.redo(&mut store), Err(Error::EmptyHistory("redo"))));
    }

    #[test]
    fn test_commit_clears_redo() {
        let (mut store, id) = setup();
        let mut history = UndoStack::new(20);

        let delta = delta_for(&store, &id, 0, 1);
        history.commit(&mut store, delta).unwrap();
        history.undo(&mut store).unwrap();
        assert!(history.can_redo());

        let delta = delta_for(&store, &id, 1, 1);
        history.commit(&mut store, delta).unwrap();
        assert!(!history.can_redo());
        assert!(matches!(history.redo(&mut store), Err(Error::EmptyHistory("redo"))));
    }

    #[test]
    fn test_depth_bound_evicts_oldest() {
        let (mut store, id) = setup();
        let mut history = UndoStack::new(2);

        for i in 0..3u32 {
            let delta = delta_for(&store, &id, i, 1);
            history.commit(&mut store, delta).unwrap();
        }
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut store).unwrap();
        history.undo(&mut store).unwrap();
        assert!(matches!(history.undo(&mut store), Err(Error::EmptyHistory("undo"))));

        // the first edit survived eviction and is no longer undoable
        assert_eq!(store.label_at(IVec3::new(0, 0, 0)).unwrap(), 1);
        assert_eq!(store.label_at(IVec3::new(1, 0, 0)).unwrap(), 0);
    }

    #[test]
    fn test_prune_segment() {
        let (mut store, a) = setup();
        let b = store.add_segment("b", [0, 255, 0]).unwrap();
        let mut history = UndoStack::new(20);

        let delta = delta_for(&store, &a, 0, 1);
        history.commit(&mut store, delta).unwrap();
        let delta = delta_for(&store, &b, 1, 2);
        history.commit(&mut store, delta).unwrap();
        let delta = delta_for(&store, &a, 2, 1);
        history.commit(&mut store, delta).unwrap();
        history.undo(&mut store).unwrap();

        history.prune_segment(&a);
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 0);
    }
}
