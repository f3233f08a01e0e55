//! Kiln: skeletal animation for real-time 3D.
//!
//! This crate re-exports the engine crates under one roof:
//! - [`animation`]: skeletons, clips, evaluation and playback
//! - [`assets`]: building skeletons and clips from importer output
//! - [`scene`]: models, the scene container and the skinning hand-off
//! - [`errors`] / [`time`]: shared error type and frame timing

pub mod animation {
    pub use kiln_animation::*;
}

pub mod assets {
    pub use kiln_assets::*;
}

pub mod scene {
    pub use kiln_scene::*;
}

pub mod errors {
    pub use kiln_core::errors::*;
}

pub mod time {
    pub use kiln_core::time::*;
}

pub use glam;

pub use animation::{
    AnimationClip, AnimationController, AnimationEvaluator, AnimationSettings, Bone,
    BoneAnimation, Keyframe, KeyframeSearch, MatrixLayout, PlaybackMode, Skeleton,
};
pub use assets::{ClipImporter, SkeletonAsset, SkeletonImporter};
pub use errors::{KilnError, Result};
pub use scene::{BonePalette, Model, ModelKey, Scene, SceneSettings, SkinningSink};
pub use time::Timer;
