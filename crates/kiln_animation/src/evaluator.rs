//! Pose evaluation: (clip, skeleton, time) → per-bone skinning matrices.

use glam::Mat4;

use crate::clip::AnimationClip;
use crate::settings::MatrixLayout;
use crate::skeleton::Skeleton;
use crate::track::KeyframeCursor;

/// Computes skinning matrices for a skeleton posed by a clip.
///
/// The evaluator holds only scratch buffers, so one instance can be reused
/// across clips and skeletons. After an evaluation the intermediate
/// local and world transforms stay readable until the next call.
///
/// # Preconditions
///
/// Parents must be stored before their children
/// ([`Skeleton::validate`] checks this). The hierarchy is not re-validated
/// per frame: a violating skeleton trips a `debug_assert!` in debug builds
/// and produces wrong poses in release builds.
///
/// Track keyframes must be sorted by time ([`AnimationClip::validate`]).
#[derive(Debug, Clone, Default)]
pub struct AnimationEvaluator {
    layout: MatrixLayout,
    local_transforms: Vec<Mat4>,
    world_transforms: Vec<Mat4>,
}

impl AnimationEvaluator {
    #[must_use]
    pub fn new(layout: MatrixLayout) -> Self {
        Self {
            layout,
            local_transforms: Vec::new(),
            world_transforms: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> MatrixLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: MatrixLayout) {
        self.layout = layout;
    }

    /// Maps wall-clock seconds into the clip's tick range.
    #[inline]
    #[must_use]
    pub fn clip_time(clip: &AnimationClip, time_seconds: f32) -> f32 {
        (time_seconds * clip.ticks_per_second()) % clip.duration()
    }

    /// Writes one skinning matrix per bone of `skeleton` into `out`.
    ///
    /// `out` is resized to exactly the bone count. Bones without a track in
    /// `clip` keep their bind-pose local transform.
    pub fn evaluate(
        &mut self,
        clip: &AnimationClip,
        skeleton: &Skeleton,
        time_seconds: f32,
        out: &mut Vec<Mat4>,
    ) {
        self.evaluate_impl(clip, skeleton, time_seconds, None, out);
    }

    /// [`evaluate`](Self::evaluate) with one keyframe cursor per bone.
    ///
    /// `cursors` is resized to the bone count; the output is identical to
    /// the cursor-less path.
    pub fn evaluate_with_cursors(
        &mut self,
        clip: &AnimationClip,
        skeleton: &Skeleton,
        time_seconds: f32,
        cursors: &mut Vec<KeyframeCursor>,
        out: &mut Vec<Mat4>,
    ) {
        cursors.resize(skeleton.len(), KeyframeCursor::default());
        self.evaluate_impl(clip, skeleton, time_seconds, Some(cursors.as_mut_slice()), out);
    }

    /// Local (parent-relative) transforms of the last evaluation.
    #[inline]
    #[must_use]
    pub fn local_transforms(&self) -> &[Mat4] {
        &self.local_transforms
    }

    /// Model-space bone transforms of the last evaluation.
    #[inline]
    #[must_use]
    pub fn world_transforms(&self) -> &[Mat4] {
        &self.world_transforms
    }

    fn evaluate_impl(
        &mut self,
        clip: &AnimationClip,
        skeleton: &Skeleton,
        time_seconds: f32,
        mut cursors: Option<&mut [KeyframeCursor]>,
        out: &mut Vec<Mat4>,
    ) {
        let bones = skeleton.bones();
        let anim_time = Self::clip_time(clip, time_seconds);

        // 1. Local pose
        self.local_transforms.clear();
        for (i, bone) in bones.iter().enumerate() {
            let local = match clip.bone_animation(&bone.name) {
                Some(track) if !track.is_empty() => {
                    let key = match cursors.as_deref_mut() {
                        Some(cursors) => track.sample_with_cursor(anim_time, &mut cursors[i]),
                        None => track.sample(anim_time),
                    };
                    key.to_matrix()
                }
                _ => bone.local_transform,
            };
            self.local_transforms.push(local);
        }

        // 2. Hierarchy, parents first
        self.world_transforms.clear();
        self.world_transforms.resize(bones.len(), Mat4::IDENTITY);
        for (i, bone) in bones.iter().enumerate() {
            let local = self.local_transforms[i];
            self.world_transforms[i] = match bone.parent {
                None => local,
                Some(parent) => {
                    debug_assert!(
                        parent < i,
                        "bone '{}' ({i}) is evaluated before its parent ({parent})",
                        bone.name
                    );
                    let parent_world = self
                        .world_transforms
                        .get(parent)
                        .copied()
                        .unwrap_or(Mat4::IDENTITY);
                    parent_world * local
                }
            };
        }

        // 3. Skinning matrices
        out.clear();
        out.extend(bones.iter().zip(&self.world_transforms).map(|(bone, world)| {
            let skinning = *world * bone.offset_matrix;
            match self.layout {
                MatrixLayout::Transposed => skinning.transpose(),
                MatrixLayout::ColumnMajor => skinning,
            }
        }));
    }
}
