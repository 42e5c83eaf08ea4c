use crate::component::{Component, ConstraintSource, SkinnedSurface, SourcedConstraint};
use crate::remap::{realize_follows, remap_surfaces};
use crate::resolve::BoneMapping;
use crate::scene::{Scene, Transform};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

fn assert_vec3(actual: Vec3, expected: Vec3) {
    let diff = actual.distance(expected);
    assert!(
        diff <= 1.0e-5,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

#[test]
fn skin_entries_follow_the_mapping_and_unmapped_entries_stay() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let target = scene.add_child(avatar, "Hips");
    let outfit = scene.add_root("Armature");
    let mapped = scene.add_child(outfit, "Hips");
    let unmapped = scene.add_child(outfit, "Pocket");
    scene.add_component(
        outfit,
        Component::Skin(SkinnedSurface {
            bones: vec![Some(mapped), Some(unmapped), None],
            root_bone: Some(mapped),
        }),
    );

    let mut mapping = BoneMapping::default();
    mapping.insert(mapped, target);
    remap_surfaces(&mut scene, outfit, &[], &mapping);

    let Component::Skin(surface) = &scene.node(outfit).unwrap().components[0] else {
        panic!("expected a skin");
    };
    assert_eq!(surface.bones, vec![Some(target), Some(unmapped), None]);
    assert_eq!(surface.root_bone, Some(target));
}

#[test]
fn constraint_sources_are_rewritten_and_weights_kept() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let target = scene.add_child(avatar, "Hips");
    let outfit = scene.add_root("Armature");
    let mapped = scene.add_child(outfit, "Hips");
    let unmapped = scene.add_child(outfit, "Tail");
    scene.add_component(
        outfit,
        Component::Constraint(SourcedConstraint {
            sources: vec![
                ConstraintSource {
                    transform: Some(mapped),
                    weight: 0.75,
                },
                ConstraintSource {
                    transform: Some(unmapped),
                    weight: 0.25,
                },
            ],
        }),
    );

    let mut mapping = BoneMapping::default();
    mapping.insert(mapped, target);
    remap_surfaces(&mut scene, outfit, &[], &mapping);

    let Component::Constraint(constraint) = &scene.node(outfit).unwrap().components[0] else {
        panic!("expected a constraint");
    };
    assert_eq!(constraint.sources[0].transform, Some(target));
    assert_eq!(constraint.sources[0].weight, 0.75);
    assert_eq!(constraint.sources[1].transform, Some(unmapped));
    assert_eq!(constraint.sources[1].weight, 0.25);
}

#[test]
fn moved_subtrees_are_remapped_too() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let target = scene.add_child(avatar, "Hips");
    let outfit = scene.add_root("Armature");
    let mapped = scene.add_child(outfit, "Hips");
    let moved = scene.add_child(outfit, "Bag");
    scene.add_component(
        moved,
        Component::Skin(SkinnedSurface {
            bones: vec![Some(mapped)],
            root_bone: None,
        }),
    );
    // Simulate the transformer having relocated the subtree already.
    scene.reparent_keep_world(moved, target);

    let mut mapping = BoneMapping::default();
    mapping.insert(mapped, target);
    remap_surfaces(&mut scene, outfit, &[moved], &mapping);

    let Component::Skin(surface) = &scene.node(moved).unwrap().components[0] else {
        panic!("expected a skin");
    };
    assert_eq!(surface.bones, vec![Some(target)]);
}

#[test]
fn realized_follows_reproduce_the_pre_merge_relative_transform() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let target = scene.add_child(avatar, "Hips");
    scene.node_mut(target).unwrap().local = Transform {
        position: Vec3::new(0.0, 1.0, 0.0),
        rotation: Quat::from_rotation_z(FRAC_PI_2),
        scale: Vec3::ONE,
    };
    let outfit = scene.add_root("Armature");
    let source = scene.add_child(outfit, "Hips");
    scene.node_mut(source).unwrap().local = Transform {
        position: Vec3::new(0.25, 1.0, 0.1),
        rotation: Quat::from_rotation_y(0.4),
        scale: Vec3::ONE,
    };

    let before = scene.world_transform(source).unwrap();
    realize_follows(&mut scene, avatar, &[(source, target)]);

    assert_eq!(scene.parent(source), Some(avatar));
    let after = scene.world_transform(source).unwrap();
    assert_vec3(after.position, before.position);

    let follows: Vec<_> = scene
        .node(source)
        .unwrap()
        .components
        .iter()
        .filter_map(|c| match c {
            Component::Follow(f) => Some(f.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(follows.len(), 1);
    let solved = follows[0].solved_world(&scene).unwrap();
    assert_vec3(solved.position, before.position);
    assert!(solved.rotation.angle_between(before.rotation) <= 1.0e-5);

    // Moving the target drags the solved pose along: that is the "visually
    // tracks without merging" contract.
    scene.node_mut(target).unwrap().local.position += Vec3::X;
    let solved = follows[0].solved_world(&scene).unwrap();
    assert_vec3(solved.position, before.position + Vec3::X);
}

#[test]
fn follow_realization_skips_dead_endpoints() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let target = scene.add_child(avatar, "Hips");
    let outfit = scene.add_root("Armature");
    let source = scene.add_child(outfit, "Hips");

    let dead = scene.add_child(outfit, "Gone");
    scene.destroy_subtree(dead);

    realize_follows(&mut scene, avatar, &[(dead, target), (source, dead)]);

    // Neither pair was realized: the source stayed put and gained nothing.
    assert_eq!(scene.parent(source), Some(outfit));
    assert!(scene.node(source).unwrap().components.is_empty());
    assert_eq!(scene.children(avatar), &[target]);
}
