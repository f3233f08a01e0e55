use std::sync::Arc;

use glam::Mat4;
use kiln_animation::{AnimationClip, AnimationController, AnimationSettings, Skeleton};
use kiln_core::errors::{KilnError, Result};
use rustc_hash::FxHashMap;

use crate::ModelKey;
use crate::palette::{BonePalette, SkinningSink};

/// A rigged scene entity: skeleton, named clips and one playback controller.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    skeleton: Arc<Skeleton>,
    clips: FxHashMap<String, Arc<AnimationClip>>,
    controller: AnimationController,
    palette: BonePalette,
}

impl Model {
    #[must_use]
    pub fn new(name: impl Into<String>, skeleton: Arc<Skeleton>) -> Self {
        Self::with_settings(name, skeleton, AnimationSettings::default())
    }

    #[must_use]
    pub fn with_settings(
        name: impl Into<String>,
        skeleton: Arc<Skeleton>,
        settings: AnimationSettings,
    ) -> Self {
        Self {
            name: name.into(),
            controller: AnimationController::with_settings(skeleton.clone(), settings),
            skeleton,
            clips: FxHashMap::default(),
            palette: BonePalette::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Registers `clip` under its name, returning the clip it replaced.
    pub fn add_clip(&mut self, clip: Arc<AnimationClip>) -> Option<Arc<AnimationClip>> {
        let unmatched = clip
            .tracks()
            .filter(|track| self.skeleton.bone_index(&track.bone_name).is_none())
            .count();
        if unmatched > 0 {
            log::debug!(
                "Model '{}': clip '{}' has {unmatched} tracks without a matching bone",
                self.name,
                clip.name()
            );
        }
        self.clips.insert(clip.name().to_string(), clip)
    }

    #[must_use]
    pub fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.get(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// Switches to the clip called `name` and starts playback from the beginning.
    pub fn play_clip(&mut self, name: &str) -> Result<()> {
        let clip = self
            .clips
            .get(name)
            .cloned()
            .ok_or_else(|| KilnError::ClipNotFound(name.to_string()))?;
        self.controller.set_clip(Some(clip));
        self.controller.play();
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    /// Per-tick update: advances playback and recomputes the bone matrices.
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update(delta_time);
        self.controller.evaluate();
    }

    /// Matrices computed by the last [`update`](Self::update).
    #[inline]
    #[must_use]
    pub fn bone_matrices(&self) -> &[Mat4] {
        self.controller.cached_matrices()
    }

    #[inline]
    #[must_use]
    pub fn palette(&self) -> &BonePalette {
        &self.palette
    }

    pub(crate) fn palette_mut(&mut self) -> &mut BonePalette {
        &mut self.palette
    }

    /// Copies the current matrices into the palette and hands it to `sink`.
    pub fn submit<S: SkinningSink + ?Sized>(&mut self, key: ModelKey, sink: &mut S) {
        self.palette.write(self.controller.cached_matrices());
        sink.upload_bone_matrices(key, &self.palette);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use kiln_animation::{Bone, Keyframe};

    use super::*;

    fn model() -> Model {
        let mut skeleton = Skeleton::new("rig");
        let root = skeleton.add_bone(Bone::new("root"));
        skeleton.add_bone(Bone::new("child").with_parent(root));

        let mut clip = AnimationClip::new("slide", 10.0).unwrap();
        clip.add_bone_animation(
            "root",
            vec![
                Keyframe::new(0.0),
                Keyframe::new(10.0).with_translation(Vec3::X * 10.0),
            ],
        );

        let mut model = Model::new("hero", skeleton.finalize().unwrap());
        model.add_clip(clip.finalize().unwrap());
        model
    }

    #[test]
    fn test_play_unknown_clip_fails() {
        let mut model = model();
        assert_eq!(
            model.play_clip("run"),
            Err(KilnError::ClipNotFound("run".to_string()))
        );
        assert!(!model.controller().is_playing());
    }

    #[test]
    fn test_update_produces_one_matrix_per_bone() {
        let mut model = model();
        model.play_clip("slide").unwrap();
        model.update(0.1);

        assert_eq!(model.bone_matrices().len(), 2);
        assert!((model.controller().current_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_add_clip_replaces_same_name() {
        let mut model = model();
        let replaced = model.add_clip(AnimationClip::new("slide", 5.0).unwrap().finalize().unwrap());
        assert!(replaced.is_some());
        assert_eq!(model.clip_names().count(), 1);
        assert!(model.clip("slide").is_some_and(|c| (c.duration() - 5.0).abs() < f32::EPSILON));
    }
}
