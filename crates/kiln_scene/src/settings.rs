use kiln_animation::AnimationSettings;

/// Default number of bone matrices a single draw can upload.
pub const DEFAULT_MAX_PALETTE_BONES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneSettings {
    /// Capacity of the per-draw bone matrix buffer.
    pub max_palette_bones: usize,
    /// Settings given to the controllers of models added to the scene.
    pub animation: AnimationSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            max_palette_bones: DEFAULT_MAX_PALETTE_BONES,
            animation: AnimationSettings::default(),
        }
    }
}
