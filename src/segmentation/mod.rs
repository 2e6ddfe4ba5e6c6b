//! Segmentation editing: mask store, region masks, effects, stroke
//! lifecycle, undo history, and the editor façade.

pub mod segment;
pub mod store;
pub mod delta;
pub mod region;
pub mod history;
pub mod effects;
pub mod scissor;
pub mod modifier;
pub mod editor;

pub use segment::{Segment, SegmentId};
pub use store::{MaskStore, OverwritePolicy};
pub use delta::{DeltaRecord, MaskDelta};
pub use region::{BitVolume, CompiledRegion, RegionMask, SegmentSelection};
pub use history::UndoStack;
pub use effects::{EffectKind, EraseScope, ModificationMode, StrokeTool};
pub use scissor::FillRule;
pub use modifier::SegmentModifier;
pub use editor::SegmentationEditor;
