//! Edit effects - what a stroke writes into the mask.
//!
//! Effects are a small closed set: the brush effect (paint/erase, writing
//! live on every sample) and the scissor effect (accumulating a lasso,
//! rasterized at commit). Both funnel their voxel writes through the
//! segment modifier, which owns the stroke lifecycle.

use serde::{Deserialize, Serialize};

use crate::brush::{self, BrushConfig};
use crate::core::types::{BACKGROUND, IVec3, Label, Vec2, Vec3};
use crate::view::ViewContext;
use crate::volume::VolumeGeometry;
use super::scissor::{self, FillRule};
use super::store::OverwritePolicy;

/// What a stroke does to the voxels it covers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationMode {
    /// Write the active segment's label
    #[default]
    Paint,
    /// Clear voxels currently labeled with the active segment
    Erase,
    /// Clear voxels regardless of which segment labels them
    EraseAll,
}

/// Erase scope exposed in configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseScope {
    /// Only the active segment's voxels are cleared (default)
    #[default]
    ActiveSegment,
    /// Any segment's voxels are cleared
    AnySegment,
}

impl EraseScope {
    /// Modification mode implementing this scope
    pub fn mode(self) -> ModificationMode {
        match self {
            EraseScope::ActiveSegment => ModificationMode::Erase,
            EraseScope::AnySegment => ModificationMode::EraseAll,
        }
    }
}

/// Tool selection on the editor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Paint,
    Erase,
    Scissor,
}

/// Decide the label to write for one voxel, or `None` to leave it alone.
///
/// Paint respects the overwrite policy: under `Never` the incumbent label
/// always wins, under `VisibleSegments` hidden segments keep their voxels.
/// Erase modes ignore the policy; they only ever clear.
pub fn target_label(
    mode: ModificationMode,
    active_label: Label,
    current: Label,
    overwrite: OverwritePolicy,
    visible_lut: &[bool; 256],
) -> Option<Label> {
    match mode {
        ModificationMode::Paint => {
            if current == active_label {
                return None;
            }
            let allowed = match overwrite {
                OverwritePolicy::AllSegments => true,
                OverwritePolicy::VisibleSegments => {
                    current == BACKGROUND || visible_lut[current as usize]
                }
                OverwritePolicy::Never => current == BACKGROUND,
            };
            allowed.then_some(active_label)
        }
        ModificationMode::Erase => (current == active_label).then_some(BACKGROUND),
        ModificationMode::EraseAll => (current != BACKGROUND).then_some(BACKGROUND),
    }
}

/// Per-stroke effect state.
///
/// Created on pointer-down, consumed on pointer-up or cancel.
#[derive(Clone, Debug)]
pub enum StrokeTool {
    Brush {
        mode: ModificationMode,
        brush: BrushConfig,
        /// World position of the previous sample, for path interpolation
        last_world: Option<Vec3>,
    },
    Scissor {
        mode: ModificationMode,
        fill_rule: FillRule,
        /// Lasso vertices in display space
        polygon: Vec<Vec2>,
    },
}

impl StrokeTool {
    pub fn mode(&self) -> ModificationMode {
        match self {
            StrokeTool::Brush { mode, .. } | StrokeTool::Scissor { mode, .. } => *mode,
        }
    }

    /// Voxels affected by this pointer sample. The brush paints live and
    /// interpolates from the previous sample; the scissor only collects
    /// its polygon here.
    pub fn sample(
        &mut self,
        geometry: &VolumeGeometry,
        view: &ViewContext,
        display: Vec2,
        world: Vec3,
        pressure: Option<f32>,
    ) -> Vec<IVec3> {
        match self {
            StrokeTool::Brush { brush, last_world, .. } => {
                let voxels = match *last_world {
                    Some(from) => {
                        brush::path_footprint(geometry, view, brush, from, world, pressure)
                    }
                    None => brush::footprint(geometry, view, brush, world, pressure),
                };
                *last_world = Some(world);
                voxels
            }
            StrokeTool::Scissor { polygon, .. } => {
                polygon.push(display);
                Vec::new()
            }
        }
    }

    /// Voxels to apply at commit time. Rasterizes the scissor polygon;
    /// the brush has already painted everything live.
    pub fn finish(&self, geometry: &VolumeGeometry, view: &ViewContext) -> Vec<IVec3> {
        match self {
            StrokeTool::Brush { .. } => Vec::new(),
            StrokeTool::Scissor { polygon, fill_rule, .. } => {
                scissor::rasterize(geometry, view, polygon, *fill_rule)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_VISIBLE: [bool; 256] = [false; 256];

    fn visible(labels: &[Label]) -> [bool; 256] {
        let mut lut = [false; 256];
        for &label in labels {
            lut[label as usize] = true;
        }
        lut
    }

    #[test]
    fn test_paint_overwrites_all_segments() {
        let lut = NO_VISIBLE;
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 0, OverwritePolicy::AllSegments, &lut),
            Some(1)
        );
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 2, OverwritePolicy::AllSegments, &lut),
            Some(1)
        );
        // already ours: nothing to do
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 1, OverwritePolicy::AllSegments, &lut),
            None
        );
    }

    #[test]
    fn test_paint_never_keeps_incumbents() {
        let lut = NO_VISIBLE;
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 0, OverwritePolicy::Never, &lut),
            Some(1)
        );
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 2, OverwritePolicy::Never, &lut),
            None
        );
    }

    #[test]
    fn test_paint_visible_segments_only() {
        let lut = visible(&[2]);
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 2, OverwritePolicy::VisibleSegments, &lut),
            Some(1)
        );
        // label 3 is hidden: keeps its voxel
        assert_eq!(
            target_label(ModificationMode::Paint, 1, 3, OverwritePolicy::VisibleSegments, &lut),
            None
        );
    }

    #[test]
    fn test_erase_scopes() {
        let lut = NO_VISIBLE;
        assert_eq!(
            target_label(ModificationMode::Erase, 1, 1, OverwritePolicy::AllSegments, &lut),
            Some(0)
        );
        assert_eq!(
            target_label(ModificationMode::Erase, 1, 2, OverwritePolicy::AllSegments, &lut),
            None
        );
        assert_eq!(
            target_label(ModificationMode::EraseAll, 1, 2, OverwritePolicy::AllSegments, &lut),
            Some(0)
        );
        assert_eq!(
            target_label(ModificationMode::EraseAll, 1, 0, OverwritePolicy::AllSegments, &lut),
            None
        );
    }

    #[test]
    fn test_erase_scope_mapping() {
        assert_eq!(EraseScope::ActiveSegment.mode(), ModificationMode::Erase);
        assert_eq!(EraseScope::AnySegment.mode(), ModificationMode::EraseAll);
    }
}
