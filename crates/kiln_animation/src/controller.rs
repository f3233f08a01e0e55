use std::sync::Arc;

use glam::Mat4;

use crate::clip::AnimationClip;
use crate::evaluator::AnimationEvaluator;
use crate::settings::{AnimationSettings, KeyframeSearch};
use crate::skeleton::Skeleton;
use crate::track::KeyframeCursor;

/// What happens when playback reaches either end of the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackMode {
    /// Stop at the end (or at the start when running backwards).
    Once,
    /// Wrap around.
    #[default]
    Loop,
    /// Bounce between the ends.
    PingPong,
}

/// Playback state of one animated instance.
///
/// The skeleton and clip are shared handles, so many controllers can drive
/// instances of the same rig independently. A controller itself is owned
/// and updated by a single model.
///
/// Time is advanced by [`update`](Self::update); matrices are recomputed only
/// by [`evaluate`](Self::evaluate) and read back with
/// [`cached_matrices`](Self::cached_matrices).
#[derive(Debug, Clone)]
pub struct AnimationController {
    skeleton: Option<Arc<Skeleton>>,
    clip: Option<Arc<AnimationClip>>,

    current_time: f32,
    playback_speed: f32,
    is_playing: bool,
    is_reversed: bool,
    mode: PlaybackMode,

    settings: AnimationSettings,
    evaluator: AnimationEvaluator,
    cursors: Vec<KeyframeCursor>,
    bone_matrices: Vec<Mat4>,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::detached(AnimationSettings::default())
    }
}

impl AnimationController {
    #[must_use]
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        Self::with_settings(skeleton, AnimationSettings::default())
    }

    #[must_use]
    pub fn with_settings(skeleton: Arc<Skeleton>, settings: AnimationSettings) -> Self {
        let mut controller = Self::detached(settings);
        controller.skeleton = Some(skeleton);
        controller
    }

    /// A controller without a skeleton. Updates still advance time, but
    /// evaluation produces nothing until a skeleton is attached.
    #[must_use]
    pub fn detached(settings: AnimationSettings) -> Self {
        Self {
            skeleton: None,
            clip: None,
            current_time: 0.0,
            playback_speed: 1.0,
            is_playing: false,
            is_reversed: false,
            mode: PlaybackMode::default(),
            settings,
            evaluator: AnimationEvaluator::new(settings.matrix_layout),
            cursors: Vec::new(),
            bone_matrices: Vec::new(),
        }
    }

    // ========================================================================
    // Playback Control
    // ========================================================================

    /// Replaces the current clip and rewinds. Does not start or stop playback.
    pub fn set_clip(&mut self, clip: Option<Arc<AnimationClip>>) {
        if let Some(clip) = &clip {
            log::debug!("AnimationController: switching to clip '{}'", clip.name());
        }
        self.clip = clip;
        self.current_time = 0.0;
        self.is_reversed = false;
        self.reset_cursors();
    }

    pub fn set_skeleton(&mut self, skeleton: Option<Arc<Skeleton>>) {
        self.skeleton = skeleton;
        self.reset_cursors();
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    /// Halts time advancement, keeping the current time.
    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Halts and rewinds.
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current_time = 0.0;
        self.is_reversed = false;
    }

    /// Rewinds without changing whether the controller is playing.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.is_reversed = false;
    }

    /// Jumps to `time` as is; the playback mode applies on the next update.
    pub fn seek(&mut self, time: f32) {
        self.current_time = time;
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    pub fn set_settings(&mut self, settings: AnimationSettings) {
        self.settings = settings;
        self.evaluator.set_layout(settings.matrix_layout);
    }

    // ========================================================================
    // Per-tick Update
    // ========================================================================

    /// Advances time by `delta_time` seconds and applies the playback mode.
    ///
    /// No-op while paused or without a clip.
    pub fn update(&mut self, delta_time: f32) {
        if !self.is_playing {
            return;
        }
        let Some(clip) = &self.clip else {
            return;
        };
        let duration = clip.duration();

        let direction = if self.is_reversed { -1.0 } else { 1.0 };
        self.current_time += delta_time * self.playback_speed * direction;

        match self.mode {
            PlaybackMode::Once => {
                if self.current_time >= duration {
                    self.current_time = duration;
                    self.is_playing = false;
                    log::debug!("AnimationController: '{}' finished", clip.name());
                } else if self.current_time < 0.0 {
                    self.current_time = 0.0;
                    self.is_playing = false;
                    log::debug!("AnimationController: '{}' rewound to start", clip.name());
                }
            }
            PlaybackMode::Loop => {
                if self.current_time >= duration {
                    self.current_time %= duration;
                } else if self.current_time < 0.0 {
                    // Remainder keeps the dividend's sign.
                    self.current_time = duration + self.current_time % duration;
                }
            }
            PlaybackMode::PingPong => {
                if self.current_time >= duration {
                    self.current_time = duration;
                    self.is_reversed = true;
                    log::debug!("AnimationController: '{}' bouncing backward", clip.name());
                } else if self.current_time <= 0.0 {
                    self.current_time = 0.0;
                    self.is_reversed = false;
                }
            }
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Recomputes the skinning matrices for the current time and caches them.
    ///
    /// Without a clip or skeleton, the previous cache is returned untouched.
    pub fn evaluate(&mut self) -> &[Mat4] {
        if let (Some(clip), Some(skeleton)) = (&self.clip, &self.skeleton) {
            match self.settings.keyframe_search {
                KeyframeSearch::Linear => self.evaluator.evaluate(
                    clip,
                    skeleton,
                    self.current_time,
                    &mut self.bone_matrices,
                ),
                KeyframeSearch::Cursor => self.evaluator.evaluate_with_cursors(
                    clip,
                    skeleton,
                    self.current_time,
                    &mut self.cursors,
                    &mut self.bone_matrices,
                ),
            }
        }
        &self.bone_matrices
    }

    /// Matrices from the last [`evaluate`](Self::evaluate), in skeleton bone order.
    #[inline]
    #[must_use]
    pub fn cached_matrices(&self) -> &[Mat4] {
        &self.bone_matrices
    }

    /// Scratch state of the last evaluation (local/world transforms).
    #[inline]
    #[must_use]
    pub fn evaluator(&self) -> &AnimationEvaluator {
        &self.evaluator
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// `current_time / duration`, or 0 without a clip. Not clamped.
    #[must_use]
    pub fn normalized_time(&self) -> f32 {
        self.clip
            .as_ref()
            .map_or(0.0, |clip| self.current_time / clip.duration())
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether PingPong playback is currently heading toward the start.
    #[inline]
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    #[inline]
    #[must_use]
    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    #[inline]
    #[must_use]
    pub fn playback_mode(&self) -> PlaybackMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    fn reset_cursors(&mut self) {
        self.cursors.iter_mut().for_each(KeyframeCursor::reset);
    }
}
