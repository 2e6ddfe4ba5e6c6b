//! Segment modifier - stroke lifecycle and change accumulation.
//!
//! Exactly one stroke can be active at a time. Brush samples write into
//! the store live (so views can show feedback) while the pre-stroke value
//! of every touched voxel is recorded once; on commit the whole stroke
//! collapses into a single deduplicated delta handed to the undo history,
//! and on cancel every recorded value is restored, leaving the store
//! bit-identical to its pre-stroke state.

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::{IVec3, Label, Result, Vec2, Vec3};
use crate::math::VoxelBox;
use crate::view::{ViewContext, ViewId};
use crate::volume::VolumeGeometry;
use super::delta::{DeltaRecord, MaskDelta};
use super::effects::{StrokeTool, target_label};
use super::history::UndoStack;
use super::region::{CompiledRegion, RegionMask};
use super::segment::SegmentId;
use super::store::{MaskStore, OverwritePolicy};

/// State of one in-flight stroke
#[derive(Debug)]
struct ActiveStroke {
    tool: StrokeTool,
    view: ViewId,
    segment: SegmentId,
    label: Label,
    region: CompiledRegion,
    overwrite: OverwritePolicy,
    visible_lut: [bool; 256],
    /// Pre-stroke label of every voxel written so far, keyed by linear index
    touched: HashMap<u32, Label>,
}

/// Applies effects to the active segment through the region mask.
#[derive(Debug, Default)]
pub struct SegmentModifier {
    active_segment: Option<SegmentId>,
    overwrite: OverwritePolicy,
    region: RegionMask,
    stroke: Option<ActiveStroke>,
}

impl SegmentModifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_segment(&self) -> Option<&SegmentId> {
        self.active_segment.as_ref()
    }

    /// Select the segment subsequent strokes edit. Does not affect an
    /// in-flight stroke.
    pub fn set_active_segment(&mut self, segment: Option<SegmentId>) {
        self.active_segment = segment;
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite
    }

    pub fn set_overwrite_policy(&mut self, policy: OverwritePolicy) {
        self.overwrite = policy;
    }

    pub fn region_mask(&self) -> &RegionMask {
        &self.region
    }

    pub fn set_region_mask(&mut self, region: RegionMask) {
        self.region = region;
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// View the active stroke belongs to, if any
    pub fn stroke_view(&self) -> Option<&ViewId> {
        self.stroke.as_ref().map(|s| &s.view)
    }

    /// Segment the active stroke edits, if any
    pub fn stroke_segment(&self) -> Option<&SegmentId> {
        self.stroke.as_ref().map(|s| &s.segment)
    }

    /// Start a stroke. Fails if one is already active (reentrancy guard),
    /// if no segment is selected, or if the region mask does not resolve
    /// against the current segment table.
    pub fn begin_stroke(&mut self, store: &MaskStore, tool: StrokeTool, view: ViewId) -> Result<()> {
        if self.stroke.is_some() {
            return Err(Error::InvalidState("a stroke is already active"));
        }
        let segment = self
            .active_segment
            .clone()
            .ok_or(Error::InvalidState("no active segment"))?;
        let label = store.label_value(&segment)?;
        let region = self.region.compile(store)?;

        self.stroke = Some(ActiveStroke {
            tool,
            view,
            segment,
            label,
            region,
            overwrite: self.overwrite,
            visible_lut: store.visible_label_lut(),
            touched: HashMap::new(),
        });
        Ok(())
    }

    /// Feed one pointer sample to the active stroke. Returns the voxel box
    /// written by this sample (possibly empty) for incremental refresh.
    pub fn update_stroke(
        &mut self,
        store: &mut MaskStore,
        geometry: &VolumeGeometry,
        view: &ViewContext,
        display: Vec2,
        world: Vec3,
        pressure: Option<f32>,
    ) -> Result<VoxelBox> {
        let stroke = self
            .stroke
            .as_mut()
            .ok_or(Error::InvalidState("no active stroke to update"))?;
        let voxels = stroke.tool.sample(geometry, view, display, world, pressure);
        Ok(apply_voxels(store, stroke, &voxels))
    }

    /// Commit the stroke as one atomic delta. Returns the edited segment
    /// and bounds, or `None` if the stroke changed nothing.
    pub fn end_stroke(
        &mut self,
        store: &mut MaskStore,
        geometry: &VolumeGeometry,
        view: &ViewContext,
        history: &mut UndoStack,
    ) -> Result<Option<(SegmentId, VoxelBox)>> {
        let mut stroke = self
            .stroke
            .take()
            .ok_or(Error::InvalidState("no active stroke to end"))?;

        // Scissors rasterize at commit; brushes have painted live already
        let commit_voxels = stroke.tool.finish(geometry, view);
        apply_voxels(store, &mut stroke, &commit_voxels);

        let records: Vec<DeltaRecord> = stroke
            .touched
            .iter()
            .map(|(&index, &prev)| {
                DeltaRecord::new(index, prev, store.label_at_index(index as usize))
            })
            .collect();
        let delta = MaskDelta::from_records(stroke.segment.clone(), records, store.dims());
        if delta.is_empty() {
            log::debug!("stroke on {} changed nothing; not recorded", stroke.segment);
            return Ok(None);
        }

        let bounds = history.commit(store, delta)?;
        Ok(Some((stroke.segment, bounds)))
    }

    /// Discard the stroke, restoring every touched voxel. Returns the
    /// stroke's segment and the restored voxel box for refresh.
    pub fn cancel_stroke(&mut self, store: &mut MaskStore) -> Result<(SegmentId, VoxelBox)> {
        let stroke = self
            .stroke
            .take()
            .ok_or(Error::InvalidState("no active stroke to cancel"))?;

        let mut bounds = VoxelBox::EMPTY;
        for (&index, &prev) in &stroke.touched {
            store.set_label_at_index(index as usize, prev);
            bounds.expand(store.coord_of_index(index as usize));
        }
        Ok((stroke.segment, bounds))
    }
}

/// Write a batch of candidate voxels through the stroke's region mask and
/// overwrite policy. Out-of-extent voxels are skipped; the stroke carries
/// on with the in-bounds remainder.
fn apply_voxels(store: &mut MaskStore, stroke: &mut ActiveStroke, voxels: &[IVec3]) -> VoxelBox {
    let mut bounds = VoxelBox::EMPTY;
    for &coord in voxels {
        let Ok(index) = store.voxel_index(coord) else {
            continue;
        };
        let current = store.label_at_index(index);
        if !stroke.region.allows(coord, index, current) {
            continue;
        }
        let Some(target) = target_label(
            stroke.tool.mode(),
            stroke.label,
            current,
            stroke.overwrite,
            &stroke.visible_lut,
        ) else {
            continue;
        };

        stroke.touched.entry(index as u32).or_insert(current);
        store.set_label_at_index(index, target);
        bounds.expand(coord);
    }
    bounds
}
