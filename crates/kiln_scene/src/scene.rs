use kiln_animation::AnimationSettings;
use slotmap::SlotMap;

use crate::ModelKey;
use crate::model::Model;
use crate::palette::SkinningSink;
use crate::settings::SceneSettings;

/// Container of animated models.
#[derive(Debug, Default)]
pub struct Scene {
    settings: SceneSettings,
    models: SlotMap<ModelKey, Model>,
}

impl Scene {
    #[must_use]
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            models: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Settings to build models with, so they match the scene.
    #[inline]
    #[must_use]
    pub fn animation_settings(&self) -> AnimationSettings {
        self.settings.animation
    }

    /// Adds a model; its palette capacity and controller settings follow the scene.
    pub fn add_model(&mut self, mut model: Model) -> ModelKey {
        model.palette_mut().set_max_bones(self.settings.max_palette_bones);
        model.controller_mut().set_settings(self.settings.animation);
        self.models.insert(model)
    }

    pub fn remove_model(&mut self, key: ModelKey) -> Option<Model> {
        self.models.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn get_model(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    #[inline]
    pub fn get_model_mut(&mut self, key: ModelKey) -> Option<&mut Model> {
        self.models.get_mut(key)
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &Model)> {
        self.models.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Advances every model by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        for model in self.models.values_mut() {
            model.update(delta_time);
        }
    }

    /// Submits the bone matrices of every model to `sink`.
    pub fn submit_all<S: SkinningSink + ?Sized>(&mut self, sink: &mut S) {
        for (key, model) in &mut self.models {
            model.submit(key, sink);
        }
    }
}
