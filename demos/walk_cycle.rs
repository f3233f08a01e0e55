//! Walk Cycle
//!
//! Builds a small leg rig from flat importer arrays, imports a walk clip
//! from separate position/rotation channels, and drives it through a
//! [`Scene`] for a couple of seconds. Skinning uploads are logged instead
//! of reaching a GPU.
//!
//! Run with `RUST_LOG=debug cargo run --example walk_cycle --features serde`.
//! An optional argument points to a JSON file with scene settings.

use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use kiln::assets::{ClipImporter, ImportedAnimation, ImportedChannel, QuatKey, SkeletonAsset, VectorKey};
use kiln::scene::{BonePalette, Model, ModelKey, Scene, SceneSettings, SkinningSink};
use kiln::{PlaybackMode, Timer};

const DEFAULT_SETTINGS: &str = r#"{
    "max_palette_bones": 64,
    "animation": { "matrix_layout": "Transposed", "keyframe_search": "Cursor" }
}"#;

struct LoggingSink;

impl SkinningSink for LoggingSink {
    fn upload_bone_matrices(&mut self, model: ModelKey, palette: &BonePalette) {
        log::debug!(
            "upload {model:?}: {} matrices, {} bytes",
            palette.len(),
            palette.as_bytes().len()
        );
    }
}

fn leg_rig() -> SkeletonAsset {
    let bind = [
        Mat4::IDENTITY,
        Mat4::from_translation(Vec3::new(0.1, -0.1, 0.0)),
        Mat4::from_translation(Vec3::new(0.0, -0.45, 0.0)),
        Mat4::from_translation(Vec3::new(0.0, -0.45, 0.0)),
    ];
    let mut world = Mat4::IDENTITY;
    let offsets = bind
        .iter()
        .map(|local| {
            world *= *local;
            world.inverse()
        })
        .collect();

    SkeletonAsset {
        name: "leg".to_string(),
        bone_names: vec!["hips".into(), "thigh".into(), "shin".into(), "foot".into()],
        parent_indices: vec![-1, 0, 1, 2],
        offset_matrices: offsets,
        local_transforms: bind.to_vec(),
    }
}

fn walk_animation() -> ImportedAnimation {
    let swing = Quat::from_rotation_x;
    ImportedAnimation {
        name: "walk".to_string(),
        duration: 24.0,
        ticks_per_second: 24.0,
        channels: vec![
            ImportedChannel {
                bone_name: "hips".to_string(),
                positions: vec![
                    VectorKey::new(0.0, Vec3::ZERO),
                    VectorKey::new(6.0, Vec3::new(0.0, 0.03, 0.0)),
                    VectorKey::new(12.0, Vec3::ZERO),
                    VectorKey::new(18.0, Vec3::new(0.0, 0.03, 0.0)),
                    VectorKey::new(24.0, Vec3::ZERO),
                ],
                ..Default::default()
            },
            ImportedChannel {
                bone_name: "thigh".to_string(),
                rotations: vec![
                    QuatKey::new(0.0, swing(FRAC_PI_4)),
                    QuatKey::new(12.0, swing(-FRAC_PI_4)),
                    QuatKey::new(24.0, swing(FRAC_PI_4)),
                ],
                ..Default::default()
            },
            ImportedChannel {
                bone_name: "shin".to_string(),
                rotations: vec![
                    QuatKey::new(0.0, Quat::IDENTITY),
                    QuatKey::new(8.0, swing(FRAC_PI_4)),
                    QuatKey::new(16.0, Quat::IDENTITY),
                ],
                ..Default::default()
            },
        ],
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEFAULT_SETTINGS.to_string(),
    };
    let settings: SceneSettings =
        serde_json::from_str(&settings_json).context("parsing scene settings")?;

    let skeleton = leg_rig().build()?;
    let clip = ClipImporter::new(settings.animation).import(walk_animation(), Some(skeleton.as_ref()))?;

    let mut scene = Scene::new(settings);
    let mut model = Model::new("walker", skeleton);
    model.add_clip(clip.finalize()?);
    model.play_clip("walk")?;
    model.controller_mut().set_playback_mode(PlaybackMode::Loop);
    let key = scene.add_model(model);

    let mut timer = Timer::new();
    let mut sink = LoggingSink;
    while timer.elapsed < Duration::from_secs(2) {
        std::thread::sleep(Duration::from_millis(16));
        let dt = timer.tick();
        scene.update(dt);
        scene.submit_all(&mut sink);

        if timer.frame_count.is_multiple_of(30)
            && let Some(model) = scene.get_model(key)
        {
            log::info!(
                "frame {}: t={:.2}s, {} bones",
                timer.frame_count,
                model.controller().current_time(),
                model.bone_matrices().len()
            );
        }
    }

    Ok(())
}
