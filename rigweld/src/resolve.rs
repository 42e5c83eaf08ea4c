use crate::config::MergeConfig;
use crate::conflict::{ConflictEntry, ResolutionPolicy};
use crate::matching::{levenshtein, strip_affixes};
use crate::merge::Outfit;
use crate::scene::{NodeId, Scene};
use crate::usage::UsedBoneSet;
use std::collections::HashMap;

/// Suffix appended by the `Rename` resolution.
pub const RENAME_SUFFIX: &str = ".unique";

/// Source→target bone lookup for one outfit's merge pass. Many sources may
/// share one target; a source has at most one target. Built fresh per
/// outfit and discarded after the pass.
#[derive(Clone, Debug, Default)]
pub struct BoneMapping {
    map: HashMap<NodeId, NodeId>,
    /// (source, target) pairs to be realized as follow constraints.
    pub follows: Vec<(NodeId, NodeId)>,
}

impl BoneMapping {
    pub fn target(&self, source: NodeId) -> Option<NodeId> {
        self.map.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.map.iter().map(|(&s, &t)| (s, t))
    }

    pub(crate) fn insert(&mut self, source: NodeId, target: NodeId) {
        self.map.insert(source, target);
    }
}

/// Decides, for every used bone of one outfit, which avatar bone it merges
/// into. Unmapped used bones are later moved instead. Mutates the scene only
/// for the `Rename` resolution, which rewrites the bone's own name.
pub fn resolve_bones(
    scene: &mut Scene,
    avatar_root: NodeId,
    outfit: &Outfit,
    used: &UsedBoneSet,
    conflicts: &[ConflictEntry],
    config: &MergeConfig,
) -> BoneMapping {
    let mut mapping = BoneMapping::default();
    let mut stack = vec![outfit.root];
    while let Some(id) = stack.pop() {
        for &child in scene.children(id).iter().rev() {
            stack.push(child);
        }
        // Excluded nodes and non-used nodes get no mapping attempt, but
        // their subtrees are still walked.
        if outfit.config.exclusions.matches(scene, id) || !used.contains(id) {
            continue;
        }
        resolve_one(scene, avatar_root, outfit, conflicts, config, id, &mut mapping);
    }
    mapping
}

fn resolve_one(
    scene: &mut Scene,
    avatar_root: NodeId,
    outfit: &Outfit,
    conflicts: &[ConflictEntry],
    config: &MergeConfig,
    id: NodeId,
    mapping: &mut BoneMapping,
) {
    let name = match scene.name(id) {
        Some(n) => n.to_owned(),
        None => return,
    };

    // Intentionally unique bones are never matched, conflict or not.
    let unique = &outfit.config.unique_prefix;
    if !unique.is_empty() && name.starts_with(unique.as_str()) {
        return;
    }

    if let Some(entry) = conflicts
        .iter()
        .find(|e| e.outfit == outfit.root && e.source == id)
    {
        match entry.resolution {
            ResolutionPolicy::ForceMerge => {
                // A dead target means the entry is stale; fall through to
                // ordinary name resolution.
                if scene.contains(entry.target) {
                    mapping.insert(id, entry.target);
                    return;
                }
            }
            ResolutionPolicy::MergeIntoCustomTarget(target) => {
                if scene.contains(target) {
                    mapping.insert(id, target);
                    return;
                }
            }
            ResolutionPolicy::ConstraintFollow(target) => {
                if scene.contains(target) {
                    mapping.follows.push((id, target));
                    return;
                }
            }
            ResolutionPolicy::Rename => {
                if let Some(node) = scene.node_mut(id) {
                    node.name.push_str(RENAME_SUFFIX);
                }
                return;
            }
            // The bone proceeds as an ordinary unmatched bone: unmapped,
            // so the transformer moves it.
            ResolutionPolicy::Skip => return,
        }
    }

    let stripped = strip_affixes(&name, &outfit.config.prefix, &outfit.config.suffix);
    let search_name = lookup_table(&outfit.config.name_table, &config.name_table, stripped);
    if let Some(target) = scene.find_descendant(avatar_root, search_name) {
        mapping.insert(id, target);
    } else if config.fuzzy_matching {
        if let Some(target) = fuzzy_match(scene, avatar_root, search_name, config.max_edit_distance)
        {
            mapping.insert(id, target);
        }
    }
}

fn lookup_table<'a>(
    outfit_table: &'a HashMap<String, String>,
    global_table: &'a HashMap<String, String>,
    name: &'a str,
) -> &'a str {
    outfit_table
        .get(name)
        .or_else(|| global_table.get(name))
        .map(|s| s.as_str())
        .unwrap_or(name)
}

/// Globally minimal edit distance over all avatar bone names; the first
/// minimal candidate in depth-first order wins ties. Targets are not
/// reserved, so two outfit bones may fuzzy-match the same avatar bone.
fn fuzzy_match(
    scene: &Scene,
    avatar_root: NodeId,
    name: &str,
    max_distance: usize,
) -> Option<NodeId> {
    let mut best: Option<(usize, NodeId)> = None;
    for id in scene.descendants(avatar_root) {
        let Some(candidate) = scene.name(id) else {
            continue;
        };
        let distance = levenshtein(name, candidate);
        if best.is_none_or(|(b, _)| distance < b) {
            best = Some((distance, id));
        }
    }
    best.filter(|&(d, _)| d <= max_distance).map(|(_, id)| id)
}
