use std::sync::Arc;

use glam::Mat4;
use kiln_core::errors::{KilnError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One joint of a [`Skeleton`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Unique within the owning skeleton. Clip tracks are matched by this name.
    pub name: String,
    /// Index of the parent bone, `None` for a root.
    pub parent: Option<usize>,
    /// Mesh (bind-pose) space to this bone's local space.
    pub offset_matrix: Mat4,
    /// Bind-pose transform relative to the parent.
    /// Used when the playing clip has no track for this bone.
    pub local_transform: Mat4,
}

impl Bone {
    /// Creates a root bone with identity offset and bind transform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            offset_matrix: Mat4::IDENTITY,
            local_transform: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the parent from the signed form used by importers, where any
    /// negative index marks a root.
    #[must_use]
    pub fn with_parent_index(mut self, parent_index: i32) -> Self {
        self.parent = usize::try_from(parent_index).ok();
        self
    }

    #[must_use]
    pub fn with_offset_matrix(mut self, offset_matrix: Mat4) -> Self {
        self.offset_matrix = offset_matrix;
        self
    }

    #[must_use]
    pub fn with_local_transform(mut self, local_transform: Mat4) -> Self {
        self.local_transform = local_transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Ordered bone hierarchy (a forest) with a name lookup.
///
/// Bones are only ever appended, so an index handed out by [`add_bone`]
/// stays valid for the lifetime of the skeleton. Once built, a skeleton is
/// meant to be shared read-only between controllers through
/// [`finalize`], which also checks the hierarchy.
///
/// [`add_bone`]: Skeleton::add_bone
/// [`finalize`]: Skeleton::finalize
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    bone_indices: FxHashMap<String, usize>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: Vec::new(),
            bone_indices: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a bone and returns its index.
    ///
    /// No hierarchy validation happens here; see [`Skeleton::validate`].
    /// A repeated name makes lookups resolve to the newest bone.
    pub fn add_bone(&mut self, bone: Bone) -> usize {
        let index = self.bones.len();
        if let Some(previous) = self.bone_indices.insert(bone.name.clone(), index) {
            log::warn!(
                "Skeleton '{}': duplicate bone name '{}', lookups now resolve to {} instead of {}",
                self.name,
                bone.name,
                index,
                previous
            );
        }
        self.bones.push(bone);
        index
    }

    /// Index of the bone called `name`, if any.
    #[inline]
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_indices.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_index(name).and_then(|index| self.bones.get(index))
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Indices of all root bones, in storage order.
    #[must_use]
    pub fn roots(&self) -> SmallVec<[usize; 4]> {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.is_root())
            .map(|(index, _)| index)
            .collect()
    }

    /// Checks the hierarchy invariants the evaluator relies on:
    /// every parent index is in range, parent chains end at a root,
    /// and every parent is stored before its children.
    pub fn validate(&self) -> Result<()> {
        let count = self.bones.len();

        for (index, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= count
            {
                return Err(KilnError::InvalidParentIndex {
                    bone: bone.name.clone(),
                    index,
                    parent,
                    count,
                });
            }
        }

        // A chain longer than the bone count must revisit a bone.
        for (index, bone) in self.bones.iter().enumerate() {
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if steps > count {
                    return Err(KilnError::CyclicHierarchy {
                        bone: bone.name.clone(),
                        index,
                    });
                }
                current = self.bones[parent].parent;
            }
        }

        for (index, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent > index
            {
                return Err(KilnError::ParentAfterChild {
                    bone: bone.name.clone(),
                    index,
                    parent,
                });
            }
        }

        Ok(())
    }

    /// Validates the hierarchy and wraps the skeleton for shared use.
    pub fn finalize(self) -> Result<Arc<Self>> {
        self.validate()?;
        log::debug!(
            "Skeleton '{}' finalized: {} bones, {} roots",
            self.name,
            self.bones.len(),
            self.roots().len()
        );
        Ok(Arc::new(self))
    }
}
