//! Segmentation editor - the top-level façade.
//!
//! Owns the mask store, undo history and segment modifier, routes pointer
//! events from registered views to the active effect, and fans out
//! refresh requests to subscribed observers. Every error is recoverable:
//! a failed stroke is canceled (the store restored) and the editor stays
//! usable.

use std::collections::HashMap;

use crate::brush::BrushConfig;
use crate::core::config::EditorConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::view::{PointerEvent, PointerEventKind, RefreshRequest, ViewContext, ViewId};
use crate::volume::VolumeGeometry;
use super::effects::{EffectKind, EraseScope, ModificationMode, StrokeTool};
use super::history::UndoStack;
use super::modifier::SegmentModifier;
use super::region::RegionMask;
use super::scissor::FillRule;
use super::segment::SegmentId;
use super::store::{MaskStore, OverwritePolicy};

type RefreshObserver = Box<dyn FnMut(&RefreshRequest) + Send>;

/// Interactive editor for one segmentation overlaid on one volume.
pub struct SegmentationEditor {
    geometry: VolumeGeometry,
    store: MaskStore,
    history: UndoStack,
    modifier: SegmentModifier,
    config: EditorConfig,
    active_effect: Option<EffectKind>,
    views: HashMap<ViewId, ViewContext>,
    observers: Vec<RefreshObserver>,
}

impl SegmentationEditor {
    /// Create an editor for a volume with an empty segmentation
    pub fn new(geometry: VolumeGeometry, config: EditorConfig) -> Self {
        let store = MaskStore::new(geometry.dims());
        let history = UndoStack::new(config.history_depth);
        Self {
            geometry,
            store,
            history,
            modifier: SegmentModifier::new(),
            config,
            active_effect: None,
            views: HashMap::new(),
            observers: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    pub fn store(&self) -> &MaskStore {
        &self.store
    }

    // -- segments ----------------------------------------------------------

    /// Add a segment; the first one added becomes active
    pub fn add_segment(&mut self, name: &str, color: [u8; 3]) -> Result<SegmentId> {
        let id = self.store.add_segment(name, color)?;
        if self.modifier.active_segment().is_none() {
            self.modifier.set_active_segment(Some(id.clone()));
        }
        Ok(id)
    }

    /// Remove a segment: cancels any stroke editing it, clears its voxels,
    /// and prunes every history entry referencing it
    pub fn remove_segment(&mut self, id: &SegmentId) -> Result<()> {
        if self.modifier.stroke_segment() == Some(id) {
            self.cancel_active_stroke()?;
        }

        let cleared = self.store.remove_segment(id)?;
        self.history.prune_segment(id);

        if self.modifier.active_segment() == Some(id) {
            let next = self.store.segment_ids().next().cloned();
            self.modifier.set_active_segment(next);
        }
        self.notify(RefreshRequest { segment: id.clone(), bounds: cleared });
        Ok(())
    }

    /// Select the segment subsequent strokes edit
    pub fn set_active_segment(&mut self, id: &SegmentId) -> Result<()> {
        self.store.segment(id)?;
        self.modifier.set_active_segment(Some(id.clone()));
        Ok(())
    }

    pub fn active_segment(&self) -> Option<&SegmentId> {
        self.modifier.active_segment()
    }

    pub fn set_segment_visible(&mut self, id: &SegmentId, visible: bool) -> Result<()> {
        self.store.set_segment_visible(id, visible)
    }

    // -- tool and settings -------------------------------------------------

    /// Select the active effect; an in-flight stroke is canceled
    pub fn set_effect(&mut self, effect: Option<EffectKind>) -> Result<()> {
        if self.modifier.is_stroke_active() {
            self.cancel_active_stroke()?;
        }
        self.active_effect = effect;
        Ok(())
    }

    pub fn effect(&self) -> Option<EffectKind> {
        self.active_effect
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.config.brush
    }

    pub fn set_brush(&mut self, brush: BrushConfig) {
        self.config.brush = brush;
    }

    pub fn set_erase_scope(&mut self, scope: EraseScope) {
        self.config.erase_scope = scope;
    }

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.config.fill_rule = rule;
    }

    /// Whether committed scissor fills paint or erase
    pub fn set_scissor_mode(&mut self, mode: ModificationMode) {
        self.config.scissor_mode = mode;
    }

    pub fn set_overwrite_policy(&mut self, policy: OverwritePolicy) {
        self.modifier.set_overwrite_policy(policy);
    }

    /// Set the region constraint for subsequent strokes. Validated against
    /// the current store so extent mismatches surface immediately.
    pub fn set_region_mask(&mut self, region: RegionMask) -> Result<()> {
        region.compile(&self.store)?;
        self.modifier.set_region_mask(region);
        Ok(())
    }

    // -- views and observers -----------------------------------------------

    /// Register a view so its pointer events can be routed
    pub fn register_view(&mut self, id: ViewId, context: ViewContext) {
        self.views.insert(id, context);
    }

    /// Update a view's transforms (zoom, pan, slice scroll)
    pub fn update_view(&mut self, id: &ViewId, context: ViewContext) -> Result<()> {
        match self.views.get_mut(id) {
            Some(slot) => {
                *slot = context;
                Ok(())
            }
            None => Err(Error::ViewNotFound(id.to_string())),
        }
    }

    /// Unregister a view; a stroke originating from it is canceled
    pub fn remove_view(&mut self, id: &ViewId) -> Result<()> {
        if self.modifier.stroke_view() == Some(id) {
            self.cancel_active_stroke()?;
        }
        self.views
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::ViewNotFound(id.to_string()))
    }

    /// Subscribe to refresh requests (explicit observer registration; the
    /// rendering collaborator may coalesce or debounce them)
    pub fn subscribe(&mut self, observer: impl FnMut(&RefreshRequest) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -- interaction -------------------------------------------------------

    /// Route a pointer event from a registered view to the active effect.
    ///
    /// Events from views other than the stroke's originating view are
    /// ignored while a stroke is in flight. A failing sample cancels the
    /// stroke (restoring the store) before the error is returned.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Result<()> {
        let view = self
            .views
            .get(&event.view)
            .cloned()
            .ok_or_else(|| Error::ViewNotFound(event.view.to_string()))?;

        match event.kind {
            PointerEventKind::Down => {
                let Some(effect) = self.active_effect else {
                    return Ok(());
                };
                if self.modifier.active_segment().is_none() {
                    log::warn!("pointer down ignored: no active segment");
                    return Ok(());
                }
                let tool = self.make_tool(effect);
                self.modifier.begin_stroke(&self.store, tool, event.view.clone())?;
                self.apply_sample(event, &view)
            }
            PointerEventKind::Move => {
                if self.modifier.stroke_view() != Some(&event.view) {
                    return Ok(());
                }
                self.apply_sample(event, &view)
            }
            PointerEventKind::Up => {
                if self.modifier.stroke_view() != Some(&event.view) {
                    return Ok(());
                }
                let committed =
                    self.modifier
                        .end_stroke(&mut self.store, &self.geometry, &view, &mut self.history)?;
                if let Some((segment, bounds)) = committed {
                    self.notify(RefreshRequest { segment, bounds });
                }
                Ok(())
            }
            PointerEventKind::Cancel => {
                if self.modifier.stroke_view() != Some(&event.view) {
                    return Ok(());
                }
                self.cancel_active_stroke()
            }
        }
    }

    /// Revert the most recent committed edit
    pub fn undo(&mut self) -> Result<()> {
        let (segment, bounds) = self.history.undo(&mut self.store)?;
        self.notify(RefreshRequest { segment, bounds });
        Ok(())
    }

    /// Reapply the most recently undone edit
    pub fn redo(&mut self) -> Result<()> {
        let (segment, bounds) = self.history.redo(&mut self.store)?;
        self.notify(RefreshRequest { segment, bounds });
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -- internals ---------------------------------------------------------

    fn make_tool(&self, effect: EffectKind) -> StrokeTool {
        match effect {
            EffectKind::Paint => StrokeTool::Brush {
                mode: ModificationMode::Paint,
                brush: self.config.brush,
                last_world: None,
            },
            EffectKind::Erase => StrokeTool::Brush {
                mode: self.config.erase_scope.mode(),
                brush: self.config.brush,
                last_world: None,
            },
            EffectKind::Scissor => StrokeTool::Scissor {
                mode: self.config.scissor_mode,
                fill_rule: self.config.fill_rule,
                polygon: Vec::new(),
            },
        }
    }

    /// Feed one sample to the active stroke, emitting an in-progress
    /// refresh bounded to the voxels it touched
    fn apply_sample(&mut self, event: &PointerEvent, view: &ViewContext) -> Result<()> {
        let world = view.display_to_world(event.position);
        let segment = self.modifier.stroke_segment().cloned();
        let result = self.modifier.update_stroke(
            &mut self.store,
            &self.geometry,
            view,
            event.position,
            world,
            event.pressure,
        );
        match result {
            Ok(bounds) => {
                if !bounds.is_empty() {
                    if let Some(segment) = segment {
                        self.notify(RefreshRequest { segment, bounds });
                    }
                }
                Ok(())
            }
            Err(error) => {
                // leave the store unmodified rather than half-painted
                if self.modifier.is_stroke_active() {
                    self.cancel_active_stroke()?;
                }
                Err(error)
            }
        }
    }

    fn cancel_active_stroke(&mut self) -> Result<()> {
        let (segment, restored) = self.modifier.cancel_stroke(&mut self.store)?;
        if !restored.is_empty() {
            self.notify(RefreshRequest { segment, bounds: restored });
        }
        Ok(())
    }

    fn notify(&mut self, request: RefreshRequest) {
        for observer in &mut self.observers {
            observer(&request);
        }
    }
}
