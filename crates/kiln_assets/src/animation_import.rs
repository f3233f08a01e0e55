use glam::{Quat, Vec3};
use kiln_animation::{AnimationClip, AnimationSettings, Keyframe, Skeleton};
use kiln_core::errors::Result;

/// One key of a single imported channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelKey<T> {
    /// Clip ticks.
    pub time: f32,
    pub value: T,
}

pub type VectorKey = ChannelKey<Vec3>;
pub type QuatKey = ChannelKey<Quat>;

impl<T> ChannelKey<T> {
    #[must_use]
    pub const fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Independent position/rotation/scale key lists of one bone, with
/// arbitrary and possibly different timestamps.
#[derive(Debug, Clone, Default)]
pub struct ImportedChannel {
    pub bone_name: String,
    pub positions: Vec<VectorKey>,
    pub rotations: Vec<QuatKey>,
    pub scales: Vec<VectorKey>,
}

impl ImportedChannel {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty() && self.scales.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportedAnimation {
    pub name: String,
    /// Clip ticks.
    pub duration: f32,
    /// Zero when the source file does not declare a rate.
    pub ticks_per_second: f32,
    pub channels: Vec<ImportedChannel>,
}

/// Merges three channels into one keyframe list.
///
/// The output has one keyframe per distinct timestamp of any channel. At
/// each timestamp every channel contributes its own key when it has one
/// there, and is interpolated between its neighbouring keys otherwise
/// (clamped to its first/last key outside its range). An empty channel
/// contributes the identity value.
///
/// Channel keys must be sorted by time.
#[must_use]
pub fn merge_channels(
    positions: &[VectorKey],
    rotations: &[QuatKey],
    scales: &[VectorKey],
) -> Vec<Keyframe> {
    let mut times: Vec<f32> = positions
        .iter()
        .map(|k| k.time)
        .chain(rotations.iter().map(|k| k.time))
        .chain(scales.iter().map(|k| k.time))
        .collect();
    times.sort_by(f32::total_cmp);
    times.dedup();

    times
        .into_iter()
        .map(|time| Keyframe {
            time,
            translation: sample_channel(positions, time, Vec3::ZERO, Vec3::lerp),
            rotation: sample_channel(rotations, time, Quat::IDENTITY, Quat::slerp),
            scale: sample_channel(scales, time, Vec3::ONE, Vec3::lerp),
        })
        .collect()
}

fn sample_channel<T: Copy>(
    keys: &[ChannelKey<T>],
    time: f32,
    empty: T,
    blend: impl Fn(T, T, f32) -> T,
) -> T {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return empty;
    };
    if time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }

    // first.time < time < last.time, so 1 <= next < len.
    let next = keys.partition_point(|k| k.time <= time);
    let (k0, k1) = (&keys[next - 1], &keys[next]);
    if k0.time >= time {
        return k0.value;
    }
    let t = (time - k0.time) / (k1.time - k0.time);
    blend(k0.value, k1.value, t)
}

/// Builds clips from imported animations.
#[derive(Debug, Clone, Default)]
pub struct ClipImporter {
    settings: AnimationSettings,
}

impl ClipImporter {
    #[must_use]
    pub fn new(settings: AnimationSettings) -> Self {
        Self { settings }
    }

    /// Converts `animation` into a validated clip.
    ///
    /// When `skeleton` is given, channels naming no bone are reported but
    /// still stored.
    pub fn import(
        &self,
        mut animation: ImportedAnimation,
        skeleton: Option<&Skeleton>,
    ) -> Result<AnimationClip> {
        let declared = animation.ticks_per_second;
        let ticks_per_second = if declared.is_finite() && declared > 0.0 {
            declared
        } else {
            self.settings.default_ticks_per_second
        };

        let mut clip = AnimationClip::new(animation.name.clone(), animation.duration)?
            .with_ticks_per_second(ticks_per_second)?;

        for channel in &mut animation.channels {
            if channel.is_empty() {
                log::warn!(
                    "Animation '{}': channel '{}' has no keys, skipped",
                    animation.name,
                    channel.bone_name
                );
                continue;
            }
            if let Some(skeleton) = skeleton
                && skeleton.bone_index(&channel.bone_name).is_none()
            {
                log::warn!(
                    "Animation '{}': channel '{}' does not match any bone of skeleton '{}'",
                    animation.name,
                    channel.bone_name,
                    skeleton.name()
                );
            }

            channel.positions.sort_by(|a, b| a.time.total_cmp(&b.time));
            channel.rotations.sort_by(|a, b| a.time.total_cmp(&b.time));
            channel.scales.sort_by(|a, b| a.time.total_cmp(&b.time));

            let keyframes = merge_channels(&channel.positions, &channel.rotations, &channel.scales);
            if clip
                .add_bone_animation(channel.bone_name.clone(), keyframes)
                .is_some()
            {
                log::warn!(
                    "Animation '{}': duplicate channel '{}', keeping the last one",
                    animation.name,
                    channel.bone_name
                );
            }
        }

        clip.validate()?;
        log::info!(
            "Imported clip '{}': {} tracks, {:.2}s",
            clip.name(),
            clip.track_count(),
            clip.duration_seconds()
        );
        Ok(clip)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_sample_channel_clamps_and_interpolates() {
        let keys = [VectorKey::new(1.0, Vec3::ZERO), VectorKey::new(3.0, Vec3::X * 2.0)];
        assert_eq!(sample_channel(&keys, 0.0, Vec3::NAN, Vec3::lerp), Vec3::ZERO);
        assert_eq!(sample_channel(&keys, 9.0, Vec3::NAN, Vec3::lerp), Vec3::X * 2.0);
        assert_eq!(sample_channel(&keys, 2.0, Vec3::NAN, Vec3::lerp), Vec3::X);
        assert_eq!(sample_channel(&[], 2.0, Vec3::ONE, Vec3::lerp), Vec3::ONE);
    }

    #[test]
    fn test_merge_uses_union_of_timestamps() {
        let positions = [VectorKey::new(0.0, Vec3::ZERO), VectorKey::new(10.0, Vec3::X * 10.0)];
        let rotations = [
            QuatKey::new(0.0, Quat::IDENTITY),
            QuatKey::new(5.0, Quat::from_rotation_y(FRAC_PI_2)),
        ];

        let keys = merge_channels(&positions, &rotations, &[]);
        let times: Vec<f32> = keys.iter().map(|k| k.time).collect();
        assert_eq!(times, [0.0, 5.0, 10.0]);

        // Position interpolated at the rotation-only timestamp.
        assert!((keys[1].translation - Vec3::X * 5.0).length() < 1e-5);
        // Rotation held after its last key.
        assert!(keys[2].rotation.angle_between(Quat::from_rotation_y(FRAC_PI_2)) < 1e-4);
        // No scale keys: identity.
        assert!(keys.iter().all(|k| k.scale == Vec3::ONE));
    }
}
