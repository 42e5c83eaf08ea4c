use crate::component::Component;
use crate::scene::{NodeId, Scene};
use std::collections::HashSet;

/// Bones of one outfit that carry skinning, closed upward to the outfit
/// root (exclusive). Computed once per outfit and not updated afterwards.
#[derive(Clone, Debug, Default)]
pub struct UsedBoneSet {
    bones: HashSet<NodeId>,
}

impl UsedBoneSet {
    pub fn contains(&self, id: NodeId) -> bool {
        self.bones.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bones.iter().copied()
    }
}

/// Collects every bone under `outfit_root` referenced by a skinned surface
/// in the same subtree, plus all ancestors of such bones up to (not
/// including) the outfit root. The root itself only enters the set through a
/// direct skin reference.
pub fn collect_used_bones(scene: &Scene, outfit_root: NodeId) -> UsedBoneSet {
    let mut set = UsedBoneSet::default();
    for id in scene.descendants(outfit_root) {
        let Some(node) = scene.node(id) else { continue };
        for component in &node.components {
            let Component::Skin(skin) = component else {
                continue;
            };
            for bone in skin.bones.iter().flatten() {
                mark(scene, outfit_root, *bone, &mut set);
            }
            if let Some(root_bone) = skin.root_bone {
                mark(scene, outfit_root, root_bone, &mut set);
            }
        }
    }
    set
}

fn mark(scene: &Scene, outfit_root: NodeId, bone: NodeId, set: &mut UsedBoneSet) {
    if !scene.is_under(bone, outfit_root) {
        return;
    }
    set.bones.insert(bone);
    if bone == outfit_root {
        // The chain above the root leaves the outfit; nothing to close over.
        return;
    }
    let mut current = scene.parent(bone);
    while let Some(ancestor) = current {
        if ancestor == outfit_root {
            break;
        }
        set.bones.insert(ancestor);
        current = scene.parent(ancestor);
    }
}
