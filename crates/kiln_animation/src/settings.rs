//! Animation Settings
//!
//! Tunables shared by the evaluator, the playback controller and the clip
//! importer.
//!
//! ```rust,ignore
//! use kiln_animation::{AnimationSettings, KeyframeSearch, MatrixLayout};
//!
//! // Column-major output for a WGSL/GLSL skinning shader
//! let settings = AnimationSettings {
//!     matrix_layout: MatrixLayout::ColumnMajor,
//!     ..Default::default()
//! };
//! ```

use crate::clip::DEFAULT_TICKS_PER_SECOND;

/// Memory layout of the skinning matrices handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixLayout {
    /// Each matrix is transposed before it is stored, matching HLSL
    /// constant-buffer packing.
    #[default]
    Transposed,
    /// Matrices are stored exactly as computed.
    ColumnMajor,
}

/// Strategy used to find the keyframes bracketing the sample time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyframeSearch {
    /// Scan every track from its first keyframe on each evaluation.
    Linear,
    /// Resume from the bracket found on the previous evaluation.
    #[default]
    Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationSettings {
    /// Tick rate given to imported clips that declare none.
    pub default_ticks_per_second: f32,
    pub matrix_layout: MatrixLayout,
    pub keyframe_search: KeyframeSearch,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            matrix_layout: MatrixLayout::default(),
            keyframe_search: KeyframeSearch::default(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings: AnimationSettings =
            serde_json::from_str(r#"{ "matrix_layout": "ColumnMajor" }"#).unwrap();
        assert_eq!(settings.matrix_layout, MatrixLayout::ColumnMajor);
        assert_eq!(settings.keyframe_search, KeyframeSearch::Cursor);
        assert!((settings.default_ticks_per_second - 30.0).abs() < f32::EPSILON);
    }
}
