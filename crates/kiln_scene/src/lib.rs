//! Scene integration for animated models.
//!
//! - [`Model`]: a rigged entity owning its skeleton, clips and playback
//! - [`Scene`]: owns models and drives their per-tick update
//! - [`BonePalette`] / [`SkinningSink`]: hand-off of skinning matrices to
//!   the renderer

pub mod model;
pub mod palette;
pub mod scene;
pub mod settings;

pub use model::Model;
pub use palette::{BonePalette, SkinningSink};
pub use scene::Scene;
pub use settings::SceneSettings;

use slotmap::new_key_type;

new_key_type! {
    pub struct ModelKey;
}
