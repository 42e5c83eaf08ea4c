use crate::component::{Component, SkinnedSurface};
use crate::scene::{NodeId, Scene};
use crate::usage::collect_used_bones;

fn skin(bones: &[Option<NodeId>], root_bone: Option<NodeId>) -> Component {
    Component::Skin(SkinnedSurface {
        bones: bones.to_vec(),
        root_bone,
    })
}

#[test]
fn referenced_bones_close_upward_to_the_outfit_root() {
    let mut scene = Scene::new();
    let armature = scene.add_root("Armature");
    let hips = scene.add_child(armature, "Hips");
    let spine = scene.add_child(hips, "Spine");
    let chest = scene.add_child(spine, "Chest");
    let body = scene.add_child(armature, "Body");
    scene.add_component(body, skin(&[Some(chest)], None));

    let used = collect_used_bones(&scene, armature);
    assert_eq!(used.len(), 3);
    for bone in [chest, spine, hips] {
        assert!(used.contains(bone));
    }
    // The upward closure stops below the root; the mesh holder is no bone.
    assert!(!used.contains(armature));
    assert!(!used.contains(body));
}

#[test]
fn root_bone_entries_count_as_references() {
    let mut scene = Scene::new();
    let armature = scene.add_root("Armature");
    let hips = scene.add_child(armature, "Hips");
    let spine = scene.add_child(hips, "Spine");
    let body = scene.add_child(armature, "Body");
    scene.add_component(body, skin(&[], Some(spine)));

    let used = collect_used_bones(&scene, armature);
    assert_eq!(used.len(), 2);
    assert!(used.contains(spine));
    assert!(used.contains(hips));
}

#[test]
fn a_direct_reference_to_the_outfit_root_enters_the_set() {
    let mut scene = Scene::new();
    let armature = scene.add_root("Armature");
    let body = scene.add_child(armature, "Body");
    scene.add_component(body, skin(&[Some(armature)], None));

    let used = collect_used_bones(&scene, armature);
    assert_eq!(used.len(), 1);
    assert!(used.contains(armature));
}

#[test]
fn null_entries_and_external_references_are_ignored() {
    let mut scene = Scene::new();
    let avatar = scene.add_root("Root");
    let avatar_hips = scene.add_child(avatar, "Hips");
    let armature = scene.add_root("Armature");
    let body = scene.add_child(armature, "Body");
    // One unset slot and one slot pointing outside the outfit entirely.
    scene.add_component(body, skin(&[None, Some(avatar_hips)], None));

    let used = collect_used_bones(&scene, armature);
    assert!(used.is_empty());
}

#[test]
fn skins_outside_the_outfit_do_not_contribute() {
    let mut scene = Scene::new();
    let armature = scene.add_root("Armature");
    let hips = scene.add_child(armature, "Hips");
    let elsewhere = scene.add_root("Elsewhere");
    scene.add_component(elsewhere, skin(&[Some(hips)], None));

    let used = collect_used_bones(&scene, armature);
    assert!(used.is_empty());
}

#[test]
fn multiple_surfaces_union_their_bones() {
    let mut scene = Scene::new();
    let armature = scene.add_root("Armature");
    let hips = scene.add_child(armature, "Hips");
    let left = scene.add_child(hips, "UpperLeg.L");
    let right = scene.add_child(hips, "UpperLeg.R");
    let pants = scene.add_child(armature, "Pants");
    let shoes = scene.add_child(armature, "Shoes");
    scene.add_component(pants, skin(&[Some(left)], None));
    scene.add_component(shoes, skin(&[Some(right)], None));

    let used = collect_used_bones(&scene, armature);
    assert_eq!(used.len(), 3);
    for bone in [left, right, hips] {
        assert!(used.contains(bone));
    }
}
