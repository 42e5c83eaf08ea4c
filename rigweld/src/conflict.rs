use crate::config::MergeConfig;
use crate::matching::strip_affixes;
use crate::merge::Outfit;
use crate::scene::{NodeId, Scene};
use crate::usage::collect_used_bones;
use glam::Vec3;

/// How the resolver handles a detected bone conflict.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResolutionPolicy {
    /// Merge into the matched avatar bone despite the transform mismatch.
    ForceMerge,
    /// Rename the outfit bone so it stays a separate bone.
    Rename,
    /// Act as if no conflict had been recorded.
    Skip,
    /// Merge into an explicitly chosen avatar bone instead of the match.
    MergeIntoCustomTarget(NodeId),
    /// Keep the bone separate and attach a follow constraint tracking the
    /// chosen avatar bone.
    ConstraintFollow(NodeId),
}

/// A name-matched bone pair whose world transforms disagree beyond the
/// configured tolerance. The host may edit `resolution` between detection
/// and merge; entries whose handles die in an earlier merge pass are stale
/// and ignored by the resolver.
#[derive(Clone, Debug)]
pub struct ConflictEntry {
    /// Root of the outfit the source bone belongs to.
    pub outfit: NodeId,
    pub source: NodeId,
    pub target: NodeId,
    pub resolution: ResolutionPolicy,
    pub position_delta: f32,
    pub rotation_delta_deg: f32,
    pub scale_delta: Vec3,
}

/// Pairs every used outfit bone with a same-named avatar bone (exact,
/// case-sensitive, first match in depth-first order) and records the pair
/// when the world transforms differ beyond the thresholds. Each call builds
/// the list fresh; the host replaces whatever list it kept from earlier
/// runs.
pub fn detect_conflicts(
    scene: &Scene,
    avatar_root: NodeId,
    outfits: &[Outfit],
    config: &MergeConfig,
) -> Vec<ConflictEntry> {
    let mut conflicts = Vec::new();
    let settings = &config.conflict;
    for outfit in outfits {
        let used = collect_used_bones(scene, outfit.root);
        for source in scene.descendants(outfit.root) {
            if !used.contains(source) {
                continue;
            }
            let Some(name) = scene.name(source) else {
                continue;
            };
            let stripped = strip_affixes(name, &outfit.config.prefix, &outfit.config.suffix);
            let Some(target) = scene.find_descendant(avatar_root, stripped) else {
                continue;
            };
            let (Some(source_world), Some(target_world)) =
                (scene.world_transform(source), scene.world_transform(target))
            else {
                continue;
            };

            let position_delta = source_world.position.distance(target_world.position);
            let rotation_delta_deg = source_world
                .rotation
                .angle_between(target_world.rotation)
                .to_degrees();
            let scale_delta = source_world.scale - target_world.scale;

            let scale_hit = settings.check_scale && scale_delta.length() > settings.scale_threshold;
            if position_delta > settings.position_threshold
                || rotation_delta_deg > settings.rotation_threshold_deg
                || scale_hit
            {
                conflicts.push(ConflictEntry {
                    outfit: outfit.root,
                    source,
                    target,
                    resolution: settings.default_resolution,
                    position_delta,
                    rotation_delta_deg,
                    scale_delta,
                });
            }
        }
    }
    conflicts
}
