//! Skeletal Animation
//!
//! This crate holds the animation core of the engine:
//! - [`Skeleton`]: ordered bone hierarchy with bind-pose data
//! - [`AnimationClip`]: named per-bone keyframe tracks in clip ticks
//! - [`AnimationEvaluator`]: turns (clip, skeleton, time) into skinning matrices
//! - [`AnimationController`]: per-instance playback state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kiln_animation::{AnimationClip, AnimationController, Bone, Keyframe, PlaybackMode, Skeleton};
//!
//! let mut skeleton = Skeleton::new("rig");
//! let root = skeleton.add_bone(Bone::new("hips"));
//! skeleton.add_bone(Bone::new("spine").with_parent(root));
//! let skeleton = skeleton.finalize()?;
//!
//! let mut clip = AnimationClip::new("idle", 60.0)?;
//! clip.add_bone_animation("spine", vec![Keyframe::new(0.0), Keyframe::new(60.0)]);
//! let clip = clip.finalize()?;
//!
//! let mut controller = AnimationController::new(skeleton);
//! controller.set_clip(Some(clip));
//! controller.set_playback_mode(PlaybackMode::Loop);
//! controller.play();
//!
//! controller.update(1.0 / 60.0);
//! let palette = controller.evaluate();
//! ```

pub mod clip;
pub mod controller;
pub mod evaluator;
pub mod keyframe;
pub mod settings;
pub mod skeleton;
pub mod track;

pub use clip::{AnimationClip, DEFAULT_TICKS_PER_SECOND};
pub use controller::{AnimationController, PlaybackMode};
pub use evaluator::AnimationEvaluator;
pub use keyframe::Keyframe;
pub use settings::{AnimationSettings, KeyframeSearch, MatrixLayout};
pub use skeleton::{Bone, Skeleton};
pub use track::{BoneAnimation, FrameIndices, KeyframeCursor};
