use glam::Vec3;
use rigweld::json::parse_merge_config;
use rigweld::{
    Component, MergeConfig, NodeId, Outfit, Scene, SkinnedSurface, Transform, collect_used_bones,
    detect_conflicts, merge_outfits,
};
use serde_json::json;

/// A small avatar plus one outfit: a shared Hips/Spine chain with a slight
/// offset (a conflict), a misspelled Chest for the fuzzy matcher, and one
/// unique bone that has to move in.
fn build_demo_scene() -> (Scene, NodeId, NodeId) {
    let mut scene = Scene::new();

    let root = scene.add_root("Root");
    let hips = scene.add_child(root, "Hips");
    let spine = scene.add_child(hips, "Spine");
    let chest = scene.add_child(spine, "Chest");
    place(&mut scene, hips, 1.0);
    place(&mut scene, spine, 0.2);
    place(&mut scene, chest, 0.3);

    let armature = scene.add_root("Armature");
    let o_hips = scene.add_child(armature, "Hips");
    let o_spine = scene.add_child(o_hips, "Spine");
    let o_chest = scene.add_child(o_spine, "Chst");
    let collar = scene.add_child(o_chest, "JacketCollar");
    place(&mut scene, o_hips, 1.05);
    place(&mut scene, o_spine, 0.2);
    place(&mut scene, o_chest, 0.3);
    scene.add_component(
        armature,
        Component::Skin(SkinnedSurface {
            bones: vec![Some(o_hips), Some(o_spine), Some(o_chest), Some(collar)],
            root_bone: Some(o_hips),
        }),
    );

    (scene, root, armature)
}

fn place(scene: &mut Scene, id: NodeId, y: f32) {
    let node = scene.node_mut(id).expect("live node");
    node.local = Transform::from_position(Vec3::new(0.0, y, 0.0));
}

fn bone_name(scene: &Scene, bone: Option<NodeId>) -> Option<String> {
    bone.and_then(|id| scene.name(id)).map(str::to_owned)
}

fn dump_component(scene: &Scene, component: &Component) -> serde_json::Value {
    match component {
        Component::Skin(skin) => json!({
            "kind": "Skin",
            "bones": skin
                .bones
                .iter()
                .map(|&b| bone_name(scene, b))
                .collect::<Vec<_>>(),
            "rootBone": bone_name(scene, skin.root_bone),
        }),
        other => json!({ "kind": format!("{:?}", other.kind()) }),
    }
}

fn dump_node(scene: &Scene, id: NodeId) -> serde_json::Value {
    let node = scene.node(id).expect("live node");
    let world = scene.world_transform(id).expect("live node");
    json!({
        "name": node.name,
        "world": [world.position.x, world.position.y, world.position.z],
        "components": node
            .components
            .iter()
            .map(|c| dump_component(scene, c))
            .collect::<Vec<_>>(),
        "children": node
            .children()
            .iter()
            .map(|&child| dump_node(scene, child))
            .collect::<Vec<_>>(),
    })
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut pretty = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--pretty" => {
                pretty = true;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let config = match positional.first() {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("read config");
            parse_merge_config(&text).expect("parse config")
        }
        None => MergeConfig {
            fuzzy_matching: true,
            ..MergeConfig::default()
        },
    };

    let (mut scene, avatar_root, outfit_root) = build_demo_scene();
    let outfits = vec![Outfit::new(outfit_root)];

    // Snapshot the used set before the merge consumes the outfit bones.
    let used = collect_used_bones(&scene, outfit_root);
    let mut used_bones: Vec<String> = used
        .iter()
        .filter_map(|id| scene.name(id).map(str::to_owned))
        .collect();
    used_bones.sort_unstable();

    let conflicts = detect_conflicts(&scene, avatar_root, &outfits, &config);
    let conflict_dump: Vec<_> = conflicts
        .iter()
        .map(|c| {
            json!({
                "source": scene.name(c.source).unwrap_or("<destroyed>"),
                "target": scene.name(c.target).unwrap_or("<destroyed>"),
                "positionDelta": c.position_delta,
                "rotationDeltaDeg": c.rotation_delta_deg,
                "scaleDelta": [c.scale_delta.x, c.scale_delta.y, c.scale_delta.z],
                "resolution": format!("{:?}", c.resolution),
            })
        })
        .collect();

    let report = merge_outfits(&mut scene, avatar_root, &outfits, &config, &conflicts);

    let outfit_dump: Vec<_> = report
        .outfits
        .iter()
        .map(|o| {
            json!({
                "name": o.name,
                "merged": o.merged,
                "moved": o.moved,
                "spliced": o.spliced,
                "destroyed": o.destroyed,
                "errors": o.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let out = json!({
        "usedBones": used_bones,
        "conflicts": conflict_dump,
        "outfits": outfit_dump,
        "crossReferences": {
            "resolved": report.cross_references.resolved,
            "nulled": report.cross_references.nulled,
        },
        "avatar": dump_node(&scene, avatar_root),
        "leftovers": scene
            .contains(outfit_root)
            .then(|| dump_node(&scene, outfit_root)),
    });

    let text = if pretty {
        serde_json::to_string_pretty(&out).expect("json")
    } else {
        serde_json::to_string(&out).expect("json")
    };
    println!("{text}");
}
