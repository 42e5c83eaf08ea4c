use crate::component::{Component, FollowConstraint};
use crate::resolve::BoneMapping;
use crate::scene::{NodeId, Scene};
use std::collections::HashSet;

/// Rewrites skin bone arrays, skin root bones and constraint source
/// transforms through the mapping. Covers the outfit-root remnant plus every
/// moved subtree, deduplicated. Unmapped entries refer to moved, still-live
/// bones and are left alone.
pub(crate) fn remap_surfaces(
    scene: &mut Scene,
    outfit_root: NodeId,
    moved: &[NodeId],
    mapping: &BoneMapping,
) {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for id in scene.descendants(outfit_root) {
        if seen.insert(id) {
            targets.push(id);
        }
    }
    for &root in moved {
        for id in scene.descendants(root) {
            if seen.insert(id) {
                targets.push(id);
            }
        }
    }
    for id in targets {
        let Some(node) = scene.node_mut(id) else { continue };
        for component in &mut node.components {
            match component {
                Component::Skin(skin) => {
                    for slot in &mut skin.bones {
                        apply(slot, mapping);
                    }
                    apply(&mut skin.root_bone, mapping);
                }
                Component::Constraint(constraint) => {
                    for source in &mut constraint.sources {
                        apply(&mut source.transform, mapping);
                    }
                }
                _ => {}
            }
        }
    }
}

fn apply(slot: &mut Option<NodeId>, mapping: &BoneMapping) {
    if let Some(bone) = *slot {
        if let Some(target) = mapping.target(bone) {
            *slot = Some(target);
        }
    }
}

/// Realizes the recorded constraint-follow pairs: each source bone moves
/// under the avatar root and gets one follow constraint whose static offset
/// reproduces the relative transform the pair had at this point.
pub(crate) fn realize_follows(
    scene: &mut Scene,
    avatar_root: NodeId,
    follows: &[(NodeId, NodeId)],
) {
    for &(source, target) in follows {
        if !scene.contains(source) || !scene.contains(target) {
            continue;
        }
        scene.reparent_keep_world(source, avatar_root);
        let (Some(source_world), Some(target_world)) =
            (scene.world_transform(source), scene.world_transform(target))
        else {
            continue;
        };
        let offset = source_world.relative_to(&target_world);
        scene.add_component(
            source,
            Component::Follow(FollowConstraint {
                target: Some(target),
                position_offset: offset.position,
                rotation_offset: offset.rotation,
            }),
        );
    }
}
