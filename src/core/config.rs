//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::brush::BrushConfig;
use crate::segmentation::effects::{EraseScope, ModificationMode};
use crate::segmentation::scissor::FillRule;
use crate::segmentation::store::OverwritePolicy;

/// Full configuration for a segmentation editor.
///
/// All fields have defaults so partial configs deserialize cleanly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Brush shape, sizing mode and diameter
    pub brush: BrushConfig,
    /// Whether erasing clears only the active segment or any segment
    pub erase_scope: EraseScope,
    /// Fill rule used when rasterizing scissor polygons
    pub fill_rule: FillRule,
    /// Whether committed scissor fills paint or erase
    pub scissor_mode: ModificationMode,
    /// Which incumbent labels a paint operation may replace
    pub overwrite: OverwritePolicy,
    /// Maximum number of undoable edits kept in history
    pub history_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            erase_scope: EraseScope::ActiveSegment,
            fill_rule: FillRule::EvenOdd,
            scissor_mode: ModificationMode::EraseAll,
            overwrite: OverwritePolicy::AllSegments,
            history_depth: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_depth, 20);
        assert_eq!(config.erase_scope, EraseScope::ActiveSegment);
        assert_eq!(config.fill_rule, FillRule::EvenOdd);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "history_depth": 4 }"#).unwrap();
        assert_eq!(config.history_depth, 4);
        assert_eq!(config.overwrite, OverwritePolicy::AllSegments);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = EditorConfig::default();
        config.brush.diameter = 3.5;
        config.fill_rule = FillRule::NonzeroWinding;

        let text = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.brush.diameter, 3.5);
        assert_eq!(back.fill_rule, FillRule::NonzeroWinding);
    }
}
