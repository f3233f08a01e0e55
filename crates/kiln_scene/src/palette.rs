use glam::Mat4;

use crate::ModelKey;
use crate::settings::DEFAULT_MAX_PALETTE_BONES;

/// Receives skinning matrices for upload, typically into a per-draw
/// constant buffer.
pub trait SkinningSink {
    fn upload_bone_matrices(&mut self, model: ModelKey, palette: &BonePalette);
}

/// Upload-ready copy of a model's skinning matrices.
///
/// Holds at most `max_bones` matrices; extra bones are dropped with a
/// warning, reported once per palette.
#[derive(Debug, Clone)]
pub struct BonePalette {
    matrices: Vec<Mat4>,
    max_bones: usize,
    truncation_reported: bool,
}

impl Default for BonePalette {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PALETTE_BONES)
    }
}

impl BonePalette {
    #[must_use]
    pub fn new(max_bones: usize) -> Self {
        Self {
            matrices: Vec::with_capacity(max_bones),
            max_bones,
            truncation_reported: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn max_bones(&self) -> usize {
        self.max_bones
    }

    pub fn set_max_bones(&mut self, max_bones: usize) {
        self.max_bones = max_bones;
        self.matrices.truncate(max_bones);
        self.truncation_reported = false;
    }

    /// Replaces the contents with `matrices`, returning how many were kept.
    pub fn write(&mut self, matrices: &[Mat4]) -> usize {
        let kept = matrices.len().min(self.max_bones);
        if kept < matrices.len() && !self.truncation_reported {
            log::warn!(
                "BonePalette: {} bone matrices exceed the palette capacity of {}, extra bones are ignored",
                matrices.len(),
                self.max_bones
            );
            self.truncation_reported = true;
        }
        self.matrices.clear();
        self.matrices.extend_from_slice(&matrices[..kept]);
        kept
    }

    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Raw bytes of the matrices, in the order they were written.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}
