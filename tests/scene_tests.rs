//! Scene Tests
//!
//! Tests for:
//! - Model clip registry and playback
//! - Scene model storage and per-tick update
//! - Skinning hand-off through SkinningSink

use std::sync::Arc;

use glam::{Mat4, Vec3};

use kiln::animation::{AnimationClip, Bone, Keyframe, MatrixLayout, PlaybackMode, Skeleton};
use kiln::errors::KilnError;
use kiln::scene::{BonePalette, Model, ModelKey, Scene, SceneSettings, SkinningSink};
use kiln::AnimationSettings;

const EPSILON: f32 = 1e-5;

#[derive(Default)]
struct CountingSink {
    uploads: usize,
    bytes: usize,
    last: Vec<Mat4>,
}

impl SkinningSink for CountingSink {
    fn upload_bone_matrices(&mut self, _model: ModelKey, palette: &BonePalette) {
        self.uploads += 1;
        self.bytes += palette.as_bytes().len();
        self.last = palette.matrices().to_vec();
    }
}

fn rig() -> Arc<Skeleton> {
    let mut skeleton = Skeleton::new("rig");
    let root = skeleton.add_bone(Bone::new("root"));
    skeleton.add_bone(
        Bone::new("tip")
            .with_parent(root)
            .with_local_transform(Mat4::from_translation(Vec3::Y)),
    );
    skeleton.finalize().unwrap()
}

fn slide(duration: f32) -> Arc<AnimationClip> {
    let mut clip = AnimationClip::new("slide", duration)
        .unwrap()
        .with_ticks_per_second(1.0)
        .unwrap();
    clip.add_bone_animation(
        "root",
        vec![
            Keyframe::new(0.0),
            Keyframe::new(duration).with_translation(Vec3::X * duration),
        ],
    );
    clip.finalize().unwrap()
}

fn column_major_scene() -> Scene {
    Scene::new(SceneSettings {
        animation: AnimationSettings {
            matrix_layout: MatrixLayout::ColumnMajor,
            ..Default::default()
        },
        ..Default::default()
    })
}

// ============================================================================
// Model
// ============================================================================

#[test]
fn model_play_clip_by_name() {
    let mut model = Model::new("hero", rig());
    model.add_clip(slide(4.0));
    assert_eq!(model.clip_names().collect::<Vec<_>>(), ["slide"]);

    model.play_clip("slide").unwrap();
    assert!(model.controller().is_playing());
    assert!(model.controller().clip().is_some_and(|c| c.name() == "slide"));
}

#[test]
fn model_play_missing_clip() {
    let mut model = Model::new("hero", rig());
    assert!(matches!(
        model.play_clip("dance"),
        Err(KilnError::ClipNotFound(name)) if name == "dance"
    ));
}

#[test]
fn model_without_clip_has_no_matrices() {
    let mut model = Model::new("hero", rig());
    model.update(0.5);
    assert!(model.bone_matrices().is_empty());
}

// ============================================================================
// Scene
// ============================================================================

#[test]
fn scene_update_moves_models() {
    let mut scene = column_major_scene();
    let mut model = Model::new("hero", rig());
    model.add_clip(slide(4.0));
    model.play_clip("slide").unwrap();
    let key = scene.add_model(model);

    scene.update(1.0);

    let model = scene.get_model(key).unwrap();
    let tip = model.bone_matrices()[1].transform_point3(Vec3::ZERO);
    assert!((tip - Vec3::new(1.0, 1.0, 0.0)).length() < EPSILON, "tip at {tip}");
}

#[test]
fn scene_once_clip_stops_at_end() {
    let mut scene = column_major_scene();
    let mut model = Model::new("hero", rig());
    model.add_clip(slide(2.0));
    model.play_clip("slide").unwrap();
    model.controller_mut().set_playback_mode(PlaybackMode::Once);
    let key = scene.add_model(model);

    for _ in 0..5 {
        scene.update(1.0);
    }

    let controller = scene.get_model(key).unwrap().controller();
    assert!(!controller.is_playing());
    assert!((controller.current_time() - 2.0).abs() < EPSILON);
}

#[test]
fn scene_submit_all_reaches_sink() {
    let mut scene = Scene::default();
    for name in ["a", "b", "c"] {
        let mut model = Model::new(name, rig());
        model.add_clip(slide(1.0));
        model.play_clip("slide").unwrap();
        scene.add_model(model);
    }
    scene.update(0.016);

    let mut sink = CountingSink::default();
    scene.submit_all(&mut sink);
    assert_eq!(sink.uploads, 3);
    assert_eq!(sink.bytes, 3 * 2 * std::mem::size_of::<Mat4>());
    assert_eq!(sink.last.len(), 2);
}

#[test]
fn scene_models_share_skeleton() {
    let skeleton = rig();
    let mut scene = Scene::default();
    scene.add_model(Model::new("a", Arc::clone(&skeleton)));
    scene.add_model(Model::new("b", Arc::clone(&skeleton)));

    assert_eq!(scene.len(), 2);
    assert!(scene.models().all(|(_, m)| Arc::ptr_eq(m.skeleton(), &skeleton)));
}
