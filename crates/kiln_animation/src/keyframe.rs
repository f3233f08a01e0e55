use glam::{Mat4, Quat, Vec3};

/// One sampled bone pose at one instant, in clip ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Keyframe {
    /// Identity pose at `time`.
    #[must_use]
    pub const fn new(time: f32) -> Self {
        Self {
            time,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Blends two poses: translation and scale linearly, rotation by slerp.
    #[must_use]
    pub fn interpolate(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            time: start.time + (end.time - start.time) * t,
            translation: start.translation.lerp(end.translation, t),
            rotation: start.rotation.slerp(end.rotation, t),
            scale: start.scale.lerp(end.scale, t),
        }
    }

    /// Local bone matrix: scale first, then rotate, then translate.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
