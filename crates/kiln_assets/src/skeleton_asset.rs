use std::sync::Arc;

use glam::Mat4;
use kiln_animation::{Bone, Skeleton};
use kiln_core::errors::{KilnError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Flat, index-aligned skeleton description as stored by an importer.
///
/// `parent_indices` uses `-1` for roots.
#[derive(Debug, Clone, Default)]
pub struct SkeletonAsset {
    pub name: String,
    pub bone_names: Vec<String>,
    pub parent_indices: Vec<i16>,
    pub offset_matrices: Vec<Mat4>,
    pub local_transforms: Vec<Mat4>,
}

impl SkeletonAsset {
    /// Builds and validates the skeleton.
    pub fn build(&self) -> Result<Arc<Skeleton>> {
        let count = self.bone_names.len();
        Self::check_len("parent_indices", count, self.parent_indices.len())?;
        Self::check_len("offset_matrices", count, self.offset_matrices.len())?;
        Self::check_len("local_transforms", count, self.local_transforms.len())?;

        let mut skeleton = Skeleton::new(self.name.clone());
        for (i, name) in self.bone_names.iter().enumerate() {
            skeleton.add_bone(
                Bone::new(name.clone())
                    .with_parent_index(i32::from(self.parent_indices[i]))
                    .with_offset_matrix(self.offset_matrices[i])
                    .with_local_transform(self.local_transforms[i]),
            );
        }
        skeleton.finalize()
    }

    fn check_len(context: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(KilnError::ImportLengthMismatch {
                context: context.to_string(),
                expected,
                actual,
            })
        }
    }
}

/// A node of an imported scene hierarchy.
#[derive(Debug, Clone, Default)]
pub struct ImportNode {
    pub name: String,
    /// Transform relative to the parent node.
    pub transform: Mat4,
    pub children: Vec<ImportNode>,
}

impl ImportNode {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: ImportNode) -> Self {
        self.children.push(child);
        self
    }
}

pub struct SkeletonImporter;

impl SkeletonImporter {
    /// Builds a skeleton from a node hierarchy.
    ///
    /// `offsets` maps skinned bone names to their offset (inverse bind)
    /// matrices. The first node in depth-first order carrying each name is
    /// the skinned bone; later nodes with the same name are ignored with a
    /// warning. Every skinned node becomes a bone, and so does every
    /// ancestor of one, so the full transform chain is kept. Ancestor-only
    /// bones get an identity offset. Bones are emitted depth first, which
    /// places every parent before its children.
    pub fn import(
        name: &str,
        root: &ImportNode,
        offsets: &FxHashMap<String, Mat4>,
    ) -> Result<Arc<Skeleton>> {
        let mut skinned = FxHashMap::default();
        claim_skinned(name, root, offsets, &mut skinned);

        let mut required = FxHashSet::default();
        mark_required(root, &skinned, &mut required);

        let mut skeleton = Skeleton::new(name);
        let mut stack: SmallVec<[(&ImportNode, Option<usize>); 16]> = SmallVec::new();
        stack.push((root, None));

        while let Some((node, parent)) = stack.pop() {
            if !required.contains(&std::ptr::from_ref(node)) {
                continue;
            }

            let offset = if is_skinned(node, &skinned) {
                offsets.get(&node.name).copied().unwrap_or(Mat4::IDENTITY)
            } else {
                Mat4::IDENTITY
            };
            let mut bone = Bone::new(node.name.clone())
                .with_local_transform(node.transform)
                .with_offset_matrix(offset);
            bone.parent = parent;
            let index = skeleton.add_bone(bone);

            // Reversed so the first child is popped first.
            for child in node.children.iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        let missing = offsets.len() - skinned.len();
        if missing > 0 {
            log::warn!("Skeleton '{name}': {missing} skinned bones were not found in the node hierarchy");
        }
        log::info!("Imported skeleton '{name}' with {} bones", skeleton.len());

        skeleton.finalize()
    }
}

/// Assigns each offset name to the first node carrying it, in depth-first order.
fn claim_skinned<'a>(
    skeleton: &str,
    node: &'a ImportNode,
    offsets: &FxHashMap<String, Mat4>,
    skinned: &mut FxHashMap<&'a str, &'a ImportNode>,
) {
    if offsets.contains_key(&node.name) {
        if skinned.contains_key(node.name.as_str()) {
            log::warn!(
                "Skeleton '{skeleton}': node name '{}' is used more than once, only the first node is skinned",
                node.name
            );
        } else {
            skinned.insert(node.name.as_str(), node);
        }
    }
    for child in &node.children {
        claim_skinned(skeleton, child, offsets, skinned);
    }
}

fn is_skinned(node: &ImportNode, skinned: &FxHashMap<&str, &ImportNode>) -> bool {
    skinned
        .get(node.name.as_str())
        .is_some_and(|claimed| std::ptr::eq(*claimed, node))
}

/// Marks `node` if it or any descendant is skinned. Returns whether it did.
fn mark_required(
    node: &ImportNode,
    skinned: &FxHashMap<&str, &ImportNode>,
    required: &mut FxHashSet<*const ImportNode>,
) -> bool {
    let mut needed = is_skinned(node, skinned);
    for child in &node.children {
        needed |= mark_required(child, skinned, required);
    }
    if needed {
        required.insert(std::ptr::from_ref(node));
    }
    needed
}
