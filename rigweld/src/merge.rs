use crate::config::{MergeConfig, OutfitConfig};
use crate::conflict::ConflictEntry;
use crate::context::MergeContext;
use crate::crossref::{CrossRefStats, remap_cross_references};
use crate::error::Error;
use crate::remap::{realize_follows, remap_surfaces};
use crate::resolve::{BoneMapping, resolve_bones};
use crate::scene::{NodeId, Scene};
use crate::usage::{UsedBoneSet, collect_used_bones};
use std::fmt;

/// One outfit to merge: its armature root plus per-outfit options. The root
/// doubles as the usage boundary and as the temporary container the host
/// discards after the batch.
#[derive(Clone, Debug)]
pub struct Outfit {
    pub root: NodeId,
    pub config: OutfitConfig,
}

impl Outfit {
    pub fn new(root: NodeId) -> Outfit {
        Outfit {
            root,
            config: OutfitConfig::default(),
        }
    }

    pub fn with_config(root: NodeId, config: OutfitConfig) -> Outfit {
        Outfit { root, config }
    }
}

/// Outcome of one outfit's pass. A non-empty `errors` list means the outfit
/// was abandoned, possibly mid-merge; the scene keeps whatever had already
/// been applied.
#[derive(Debug)]
pub struct OutfitReport {
    pub outfit: NodeId,
    pub name: String,
    pub merged: usize,
    pub moved: usize,
    pub spliced: usize,
    pub destroyed: usize,
    pub errors: Vec<Error>,
}

/// End-of-run summary over the whole batch.
#[derive(Debug)]
pub struct MergeReport {
    pub outfits: Vec<OutfitReport>,
    pub cross_references: CrossRefStats,
}

impl MergeReport {
    pub fn success(&self) -> bool {
        self.outfits.iter().all(|o| o.errors.is_empty())
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outfit in &self.outfits {
            if outfit.errors.is_empty() {
                writeln!(
                    f,
                    "outfit '{}': merged {}, moved {}, spliced {}, destroyed {}",
                    outfit.name, outfit.merged, outfit.moved, outfit.spliced, outfit.destroyed
                )?;
            } else {
                for error in &outfit.errors {
                    writeln!(f, "outfit '{}': abandoned: {error}", outfit.name)?;
                }
            }
        }
        write!(
            f,
            "cross-references: {} resolved, {} nulled",
            self.cross_references.resolved, self.cross_references.nulled
        )
    }
}

/// Merges every outfit into the avatar skeleton, strictly in order, then
/// repairs cross-references over the whole avatar once. Structural problems
/// abandon the offending outfit and the batch continues; the function itself
/// never fails. The scene is mutated in place with no rollback.
///
/// Outfit roots must not lie inside the avatar skeleton subtree: name
/// searches scan everything beneath the avatar root and would otherwise see
/// the outfit's own bones as merge targets. Later outfits do resolve against
/// bones moved in by earlier ones; that ordering is intentional.
pub fn merge_outfits(
    scene: &mut Scene,
    avatar_root: NodeId,
    outfits: &[Outfit],
    config: &MergeConfig,
    conflicts: &[ConflictEntry],
) -> MergeReport {
    let mut ctx = MergeContext::new();
    let avatar_alive = scene.contains(avatar_root);
    let mut reports = Vec::with_capacity(outfits.len());
    for outfit in outfits {
        let name = scene.name(outfit.root).unwrap_or("<destroyed>").to_owned();
        let mut report = OutfitReport {
            outfit: outfit.root,
            name,
            merged: 0,
            moved: 0,
            spliced: 0,
            destroyed: 0,
            errors: Vec::new(),
        };
        let result = if avatar_alive {
            process_outfit(scene, avatar_root, outfit, config, conflicts, &mut ctx, &mut report)
        } else {
            Err(Error::MissingAvatarRoot)
        };
        if let Err(error) = result {
            log::warn!("outfit '{}' abandoned: {error}", report.name);
            report.errors.push(error);
        }
        reports.push(report);
    }
    let cross_references = if avatar_alive {
        remap_cross_references(scene, avatar_root, &mut ctx)
    } else {
        CrossRefStats::default()
    };
    MergeReport {
        outfits: reports,
        cross_references,
    }
}

fn process_outfit(
    scene: &mut Scene,
    avatar_root: NodeId,
    outfit: &Outfit,
    config: &MergeConfig,
    conflicts: &[ConflictEntry],
    ctx: &mut MergeContext,
    report: &mut OutfitReport,
) -> Result<(), Error> {
    if !scene.contains(outfit.root) {
        return Err(Error::MissingOutfitRoot);
    }
    let used = collect_used_bones(scene, outfit.root);
    if used.is_empty() {
        return Err(Error::NoUsedBones {
            outfit: report.name.clone(),
        });
    }
    let mapping = resolve_bones(scene, avatar_root, outfit, &used, conflicts, config);
    let outcome = merge_hierarchy(scene, avatar_root, outfit, &used, &mapping, ctx);
    report.merged = outcome.merged;
    report.moved = outcome.moved.len();
    report.spliced = outcome.spliced;
    report.destroyed = outcome.destroyed;
    remap_surfaces(scene, outfit.root, &outcome.moved, &mapping);
    realize_follows(scene, avatar_root, &mapping.follows);
    Ok(())
}

pub(crate) struct MergeOutcome {
    pub(crate) merged: usize,
    pub(crate) spliced: usize,
    pub(crate) destroyed: usize,
    /// Used bones relocated into the avatar, in traversal order.
    pub(crate) moved: Vec<NodeId>,
}

/// Restructures one outfit tree into the avatar: merged bones hand their
/// children to the mapped avatar bone and are destroyed afterwards, moved
/// bones are reparented world-preserving, everything else is spliced out.
/// Destruction runs strictly after the traversal, children before parents,
/// so no relink ever targets a dead node.
pub(crate) fn merge_hierarchy(
    scene: &mut Scene,
    avatar_root: NodeId,
    outfit: &Outfit,
    used: &UsedBoneSet,
    mapping: &BoneMapping,
    ctx: &mut MergeContext,
) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        merged: 0,
        spliced: 0,
        destroyed: 0,
        moved: Vec::new(),
    };
    let mut doomed = Vec::new();
    relink(scene, outfit, used, mapping, outfit.root, avatar_root, &mut outcome, &mut doomed);
    // doomed is in post-order. Destroying a merged bone also frees any
    // spliced leftovers still attached beneath it.
    for id in doomed {
        for node in scene.descendants(id) {
            ctx.record_destroyed(node, scene.name_chain(node));
        }
        outcome.destroyed += scene.destroy_subtree(id);
    }
    outcome
}

#[allow(clippy::too_many_arguments)]
fn relink(
    scene: &mut Scene,
    outfit: &Outfit,
    used: &UsedBoneSet,
    mapping: &BoneMapping,
    id: NodeId,
    target_parent: NodeId,
    outcome: &mut MergeOutcome,
    doomed: &mut Vec<NodeId>,
) {
    let children: Vec<NodeId> = scene.children(id).to_vec();
    if outfit.config.exclusions.matches(scene, id) || !used.contains(id) {
        // Splice-out: the node stays where it is, its children are promoted
        // past it onto the same target.
        outcome.spliced += 1;
        for child in children {
            relink(scene, outfit, used, mapping, child, target_parent, outcome, doomed);
        }
        return;
    }
    match mapping.target(id) {
        Some(target) => {
            for child in children {
                relink(scene, outfit, used, mapping, child, target, outcome, doomed);
            }
            doomed.push(id);
            outcome.merged += 1;
        }
        None => {
            scene.reparent_keep_world(id, target_parent);
            outcome.moved.push(id);
            for child in children {
                relink(scene, outfit, used, mapping, child, id, outcome, doomed);
            }
        }
    }
}
