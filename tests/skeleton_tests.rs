//! Skeleton Tests
//!
//! Tests for:
//! - Bone insertion and name lookup
//! - Root discovery
//! - Hierarchy validation (range, cycles, parent ordering)

use glam::{Mat4, Vec3};

use kiln::animation::{Bone, Skeleton};
use kiln::errors::KilnError;

fn humanoid() -> Skeleton {
    let mut skeleton = Skeleton::new("humanoid");
    let hips = skeleton.add_bone(Bone::new("hips"));
    let spine = skeleton.add_bone(Bone::new("spine").with_parent(hips));
    skeleton.add_bone(Bone::new("head").with_parent(spine));
    skeleton.add_bone(Bone::new("arm_l").with_parent(spine));
    skeleton.add_bone(Bone::new("arm_r").with_parent(spine));
    skeleton
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn bone_lookup_round_trips_insertion_index() {
    let mut skeleton = Skeleton::new("rig");
    let names = ["root", "a", "b", "c", "d"];
    let mut inserted = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let mut bone = Bone::new(*name);
        bone.parent = i.checked_sub(1);
        inserted.push(skeleton.add_bone(bone));
    }

    for (name, index) in names.iter().zip(inserted) {
        assert_eq!(skeleton.bone_index(name), Some(index));
        assert_eq!(skeleton.bone(index).map(|b| b.name.as_str()), Some(*name));
    }
}

#[test]
fn bone_lookup_missing_name() {
    let skeleton = humanoid();
    assert_eq!(skeleton.bone_index("tail"), None);
    assert!(skeleton.bone_by_name("tail").is_none());
}

#[test]
fn duplicate_name_resolves_to_newest_bone() {
    let mut skeleton = Skeleton::new("rig");
    skeleton.add_bone(Bone::new("root"));
    let second = skeleton.add_bone(Bone::new("root").with_offset_matrix(Mat4::from_scale(Vec3::splat(2.0))));
    assert_eq!(skeleton.len(), 2);
    assert_eq!(skeleton.bone_index("root"), Some(second));
}

#[test]
fn roots_are_listed_in_storage_order() {
    let mut skeleton = humanoid();
    skeleton.add_bone(Bone::new("prop"));
    assert_eq!(skeleton.roots().as_slice(), &[0, 5]);
}

#[test]
fn negative_parent_index_means_root() {
    let bone = Bone::new("root").with_parent_index(-1);
    assert!(bone.is_root());
    let bone = Bone::new("child").with_parent_index(3);
    assert_eq!(bone.parent, Some(3));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn valid_hierarchy_finalizes() {
    let skeleton = humanoid().finalize().unwrap();
    assert_eq!(skeleton.len(), 5);
    assert!(!skeleton.is_empty());
}

#[test]
fn empty_skeleton_is_valid() {
    assert!(Skeleton::new("empty").finalize().is_ok());
}

#[test]
fn out_of_range_parent_is_rejected() {
    let mut skeleton = humanoid();
    skeleton.add_bone(Bone::new("ghost").with_parent(42));
    assert!(matches!(
        skeleton.validate(),
        Err(KilnError::InvalidParentIndex { index: 5, parent: 42, count: 6, .. })
    ));
}

#[test]
fn cycle_is_rejected() {
    let mut skeleton = Skeleton::new("loop");
    skeleton.add_bone(Bone::new("a").with_parent(1));
    skeleton.add_bone(Bone::new("b").with_parent(0));
    assert!(matches!(
        skeleton.finalize(),
        Err(KilnError::CyclicHierarchy { .. })
    ));
}

#[test]
fn self_parent_is_a_cycle() {
    let mut skeleton = Skeleton::new("self");
    skeleton.add_bone(Bone::new("a").with_parent(0));
    assert!(matches!(
        skeleton.validate(),
        Err(KilnError::CyclicHierarchy { index: 0, .. })
    ));
}

#[test]
fn parent_stored_after_child_is_rejected() {
    let mut skeleton = Skeleton::new("reversed");
    skeleton.add_bone(Bone::new("child").with_parent(1));
    skeleton.add_bone(Bone::new("root"));
    assert!(matches!(
        skeleton.validate(),
        Err(KilnError::ParentAfterChild { index: 0, parent: 1, .. })
    ));
}
