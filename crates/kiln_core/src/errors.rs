//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`KilnError`] covers the failure modes that can be
//! detected while *building* animation data:
//! - Malformed skeleton hierarchies (bad parent links, cycles, ordering)
//! - Degenerate clips (zero duration, bad tick rate, unsorted keyframes)
//! - Import mismatches between parallel data arrays
//! - Scene lookups driven by name
//!
//! Per-frame operations (playback updates, pose evaluation) never return
//! errors; missing optional data degrades to a default pose instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kiln_core::errors::{KilnError, Result};
//!
//! fn build() -> Result<()> {
//!     // Construction steps that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Kiln engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KilnError {
    // ========================================================================
    // Skeleton Errors
    // ========================================================================
    /// A bone's parent index points outside the bone array.
    #[error("Bone '{bone}' (index {index}) references parent {parent}, but the skeleton has {count} bones")]
    InvalidParentIndex {
        /// Name of the offending bone
        bone: String,
        /// Index of the offending bone
        index: usize,
        /// The out-of-range parent index
        parent: usize,
        /// Number of bones in the skeleton
        count: usize,
    },

    /// Following parent links from a bone never reaches a root.
    #[error("Bone '{bone}' (index {index}) is part of a cyclic parent chain")]
    CyclicHierarchy {
        /// Name of the first bone found on the cycle
        bone: String,
        /// Index of that bone
        index: usize,
    },

    /// A bone is stored before its parent, so a single ordered pass
    /// cannot accumulate world transforms.
    #[error("Bone '{bone}' (index {index}) is stored before its parent (index {parent})")]
    ParentAfterChild {
        /// Name of the offending bone
        bone: String,
        /// Index of the offending bone
        index: usize,
        /// Index of its parent
        parent: usize,
    },

    // ========================================================================
    // Animation Clip Errors
    // ========================================================================
    /// Clip duration is zero, negative or not finite.
    #[error("Clip '{clip}' has invalid duration {duration} (must be finite and > 0)")]
    InvalidClipDuration {
        /// Clip name
        clip: String,
        /// The rejected duration, in ticks
        duration: f32,
    },

    /// Ticks-per-second is zero, negative or not finite.
    #[error("Clip '{clip}' has invalid tick rate {ticks_per_second} (must be finite and > 0)")]
    InvalidTicksPerSecond {
        /// Clip name
        clip: String,
        /// The rejected rate
        ticks_per_second: f32,
    },

    /// Keyframes of a track are not in ascending time order.
    #[error("Clip '{clip}': track '{bone}' keyframe {index} is earlier than the keyframe before it")]
    UnsortedKeyframes {
        /// Clip name
        clip: String,
        /// Bone name of the track
        bone: String,
        /// Index of the first out-of-order keyframe
        index: usize,
    },

    // ========================================================================
    // Import Errors
    // ========================================================================
    /// Parallel per-bone arrays supplied by an importer disagree in length.
    #[error("Import data mismatch: {context} (expected {expected}, got {actual})")]
    ImportLengthMismatch {
        /// Description of the array being checked
        context: String,
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// The requested clip is not registered on the model.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),
}

/// Alias for `Result<T, KilnError>`.
pub type Result<T> = std::result::Result<T, KilnError>;
