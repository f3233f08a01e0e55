use std::sync::Arc;

use kiln_core::errors::{KilnError, Result};
use rustc_hash::FxHashMap;

use crate::keyframe::Keyframe;
use crate::track::BoneAnimation;

/// Tick rate assumed when a clip does not declare one.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 30.0;

/// A named animation: one keyframe track per bone, timed in clip ticks.
///
/// The duration and tick rate are validated when set, so evaluation can
/// remap time without guarding against a zero-length clip.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    tracks: FxHashMap<String, BoneAnimation>,
}

impl AnimationClip {
    /// Creates an empty clip `duration` ticks long at the default tick rate.
    pub fn new(name: impl Into<String>, duration: f32) -> Result<Self> {
        let name = name.into();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(KilnError::InvalidClipDuration {
                clip: name,
                duration,
            });
        }

        Ok(Self {
            name,
            duration,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            tracks: FxHashMap::default(),
        })
    }

    pub fn with_ticks_per_second(mut self, ticks_per_second: f32) -> Result<Self> {
        self.set_ticks_per_second(ticks_per_second)?;
        Ok(self)
    }

    pub fn set_ticks_per_second(&mut self, ticks_per_second: f32) -> Result<()> {
        if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
            return Err(KilnError::InvalidTicksPerSecond {
                clip: self.name.clone(),
                ticks_per_second,
            });
        }
        self.ticks_per_second = ticks_per_second;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the clip in ticks.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration / self.ticks_per_second
    }

    /// Stores the track for `bone_name`, returning the track it replaced.
    pub fn add_bone_animation(
        &mut self,
        bone_name: impl Into<String>,
        keyframes: Vec<Keyframe>,
    ) -> Option<BoneAnimation> {
        let bone_name = bone_name.into();
        let track = BoneAnimation::new(bone_name.clone(), keyframes);
        self.tracks.insert(bone_name, track)
    }

    #[inline]
    #[must_use]
    pub fn bone_animation(&self, bone_name: &str) -> Option<&BoneAnimation> {
        self.tracks.get(bone_name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &BoneAnimation> {
        self.tracks.values()
    }

    #[inline]
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Checks that every track's keyframes are in ascending time order.
    pub fn validate(&self) -> Result<()> {
        for track in self.tracks.values() {
            if let Some(index) = track.first_unsorted_index() {
                return Err(KilnError::UnsortedKeyframes {
                    clip: self.name.clone(),
                    bone: track.bone_name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Validates the clip and wraps it for sharing between controllers.
    pub fn finalize(self) -> Result<Arc<Self>> {
        self.validate()?;
        log::debug!(
            "Clip '{}' finalized: {} tracks, {} ticks @ {} ticks/s",
            self.name,
            self.tracks.len(),
            self.duration,
            self.ticks_per_second
        );
        Ok(Arc::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_degenerate_duration() {
        for duration in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(
                    AnimationClip::new("bad", duration),
                    Err(KilnError::InvalidClipDuration { .. })
                ),
                "duration {duration} accepted"
            );
        }
    }

    #[test]
    fn test_ticks_per_second_defaults_and_validates() {
        let clip = AnimationClip::new("walk", 60.0).unwrap();
        assert!((clip.ticks_per_second() - DEFAULT_TICKS_PER_SECOND).abs() < f32::EPSILON);
        assert!((clip.duration_seconds() - 2.0).abs() < 1e-6);

        let clip = clip.with_ticks_per_second(120.0).unwrap();
        assert!((clip.duration_seconds() - 0.5).abs() < 1e-6);

        let mut clip = clip;
        assert!(matches!(
            clip.set_ticks_per_second(0.0),
            Err(KilnError::InvalidTicksPerSecond { .. })
        ));
        assert!((clip.ticks_per_second() - 120.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_add_bone_animation_overwrites() {
        let mut clip = AnimationClip::new("walk", 10.0).unwrap();
        assert!(clip.add_bone_animation("hip", vec![Keyframe::new(0.0)]).is_none());
        let previous = clip.add_bone_animation("hip", vec![Keyframe::new(0.0), Keyframe::new(10.0)]);

        assert_eq!(previous.as_ref().map(BoneAnimation::len), Some(1));
        assert_eq!(clip.track_count(), 1);
        assert_eq!(clip.bone_animation("hip").map(BoneAnimation::len), Some(2));
        assert!(clip.bone_animation("knee").is_none());
    }

    #[test]
    fn test_validate_reports_unsorted_track() {
        let mut clip = AnimationClip::new("walk", 10.0).unwrap();
        clip.add_bone_animation("hip", vec![Keyframe::new(5.0), Keyframe::new(1.0)]);
        assert!(matches!(
            clip.validate(),
            Err(KilnError::UnsortedKeyframes { index: 1, .. })
        ));
        assert!(clip.finalize().is_err());
    }
}
