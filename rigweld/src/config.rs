use crate::conflict::ResolutionPolicy;
use crate::matching::glob_match;
use crate::scene::{NodeId, Scene};
use std::collections::HashMap;

/// Thresholds deciding when a same-joint bone pair counts as conflicting.
#[derive(Clone, Debug)]
pub struct ConflictSettings {
    /// World-position distance above which a pair conflicts, in scene units.
    pub position_threshold: f32,
    /// Shortest-arc world-rotation angle above which a pair conflicts.
    pub rotation_threshold_deg: f32,
    /// Per-component world-scale difference above which a pair conflicts.
    pub scale_threshold: f32,
    /// Scale differences are ignored unless this is set.
    pub check_scale: bool,
    /// Resolution newly detected conflicts start out with.
    pub default_resolution: ResolutionPolicy,
}

impl Default for ConflictSettings {
    fn default() -> Self {
        ConflictSettings {
            position_threshold: 0.001,
            rotation_threshold_deg: 0.1,
            scale_threshold: 0.01,
            check_scale: false,
            default_resolution: ResolutionPolicy::ForceMerge,
        }
    }
}

/// Batch-wide merge options shared by every outfit.
#[derive(Clone, Debug)]
pub struct MergeConfig {
    /// Outfit-name → avatar-name replacements applied after affix stripping.
    pub name_table: HashMap<String, String>,
    /// Fall back to edit-distance matching when no exact name matches.
    pub fuzzy_matching: bool,
    /// Largest edit distance a fuzzy match may have.
    pub max_edit_distance: usize,
    pub conflict: ConflictSettings,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            name_table: HashMap::new(),
            fuzzy_matching: false,
            max_edit_distance: 2,
            conflict: ConflictSettings::default(),
        }
    }
}

/// Per-outfit matching options. Entries in `name_table` take precedence over
/// the batch-wide table on key collision.
#[derive(Clone, Debug, Default)]
pub struct OutfitConfig {
    /// Prefix stripped from outfit bone names before matching.
    pub prefix: String,
    /// Suffix stripped from outfit bone names before matching.
    pub suffix: String,
    /// Bones whose name starts with this are never merged.
    pub unique_prefix: String,
    pub name_table: HashMap<String, String>,
    pub exclusions: ExclusionRules,
}

/// Nodes the merge treats as plain containers: never matched, never moved,
/// spliced out of the hierarchy.
#[derive(Clone, Debug, Default)]
pub struct ExclusionRules {
    pub nodes: Vec<NodeId>,
    /// Name patterns with `*` (any run) and `?` (any one char).
    pub patterns: Vec<String>,
}

impl ExclusionRules {
    pub fn matches(&self, scene: &Scene, id: NodeId) -> bool {
        if self.nodes.contains(&id) {
            return true;
        }
        let Some(name) = scene.name(id) else {
            return false;
        };
        self.patterns.iter().any(|p| glob_match(p, name))
    }
}
