//! Asset Import
//!
//! Turns data produced by an external model importer into the engine's
//! animation types:
//! - [`SkeletonAsset`] / [`SkeletonImporter`]: flat bone arrays or a node
//!   hierarchy → [`Skeleton`](kiln_animation::Skeleton)
//! - [`ClipImporter`]: per-channel position/rotation/scale keys →
//!   [`AnimationClip`](kiln_animation::AnimationClip)

pub mod animation_import;
pub mod skeleton_asset;

pub use animation_import::{
    ChannelKey, ClipImporter, ImportedAnimation, ImportedChannel, QuatKey, VectorKey,
    merge_channels,
};
pub use skeleton_asset::{ImportNode, SkeletonAsset, SkeletonImporter};
