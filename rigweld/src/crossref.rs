use crate::component::{Component, ComponentKind, ObjectRef, Value, ValueObject};
use crate::context::MergeContext;
use crate::scene::{NodeId, Scene};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Counts from the final reference-repair sweep.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CrossRefStats {
    /// References rewritten to a surviving avatar node.
    pub resolved: usize,
    /// References nulled because nothing surviving matched.
    pub nulled: usize,
}

/// The node whose components are currently detached for repair. Kind checks
/// against this node must consult the detached set; its live vec is empty
/// until the components go back.
#[derive(Copy, Clone)]
struct SweptNode<'a> {
    id: NodeId,
    kinds: &'a [ComponentKind],
}

/// Repairs every component reference under the avatar root that points at a
/// destroyed node or at a live node outside the avatar. Structured fields go
/// through each component's declared-reference visitor; animator payloads
/// are walked as value graphs with a run-wide visited set, so shared or
/// cyclic graphs are swept exactly once. Unresolvable references are nulled,
/// never left dangling.
pub(crate) fn remap_cross_references(
    scene: &mut Scene,
    avatar_root: NodeId,
    ctx: &mut MergeContext,
) -> CrossRefStats {
    let mut stats = CrossRefStats::default();
    let mut visited: HashSet<*const RefCell<ValueObject>> = HashSet::new();
    for id in scene.descendants(avatar_root) {
        let Some(node) = scene.node_mut(id) else { continue };
        // Components come out of the node so the repair logic can read the
        // rest of the scene while rewriting them.
        let mut components = std::mem::take(&mut node.components);
        let kinds: Vec<ComponentKind> = components.iter().map(Component::kind).collect();
        let swept = SweptNode { id, kinds: &kinds };
        for component in &mut components {
            match component {
                Component::Animator(animator) => {
                    let values = [&mut animator.layers, &mut animator.parameters];
                    for value in values {
                        sweep_value(
                            value, scene, avatar_root, ctx, swept, &mut visited, &mut stats,
                        );
                    }
                }
                other => {
                    other.remap_structured_refs(&mut |reference| {
                        fix_ref(scene, avatar_root, ctx, swept, &mut stats, reference)
                    });
                }
            }
        }
        if let Some(node) = scene.node_mut(id) {
            node.components = components;
        }
    }
    stats
}

fn sweep_value(
    value: &mut Value,
    scene: &Scene,
    avatar_root: NodeId,
    ctx: &mut MergeContext,
    swept: SweptNode<'_>,
    visited: &mut HashSet<*const RefCell<ValueObject>>,
    stats: &mut CrossRefStats,
) {
    match value {
        Value::Ref(reference) => {
            match fix_ref(scene, avatar_root, ctx, swept, stats, *reference) {
                Some(fixed) => *value = Value::Ref(fixed),
                None => *value = Value::Null,
            }
        }
        Value::List(items) => {
            for item in items {
                sweep_value(item, scene, avatar_root, ctx, swept, visited, stats);
            }
        }
        Value::Object(object) => {
            // Mark before descending; a cycle back to this object ends here
            // instead of borrowing it twice.
            if !visited.insert(Rc::as_ptr(object)) {
                return;
            }
            let object = Rc::clone(object);
            let mut fields = object.borrow_mut();
            for (_, field) in &mut fields.fields {
                sweep_value(field, scene, avatar_root, ctx, swept, visited, stats);
            }
        }
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => {}
    }
}

/// Leaves healthy references (live, under the avatar root) untouched and
/// uncounted. Everything else is resolved by name chain or nulled.
fn fix_ref(
    scene: &Scene,
    avatar_root: NodeId,
    ctx: &mut MergeContext,
    swept: SweptNode<'_>,
    stats: &mut CrossRefStats,
    reference: ObjectRef,
) -> Option<ObjectRef> {
    if scene.contains(reference.node) && scene.is_under(reference.node, avatar_root) {
        return Some(reference);
    }
    let chain = if scene.contains(reference.node) {
        Some(scene.name_chain(reference.node))
    } else {
        ctx.destroyed_chain(reference.node).map(|c| c.to_vec())
    };
    let fixed = chain
        .and_then(|chain| resolve_chain(scene, avatar_root, ctx, &chain))
        .and_then(|node| match reference.component {
            None => Some(ObjectRef::node(node)),
            Some(kind) => has_component(scene, swept, node, kind)
                .then_some(ObjectRef::component(node, kind)),
        });
    match fixed {
        Some(fixed) => {
            stats.resolved += 1;
            log::debug!(
                "cross-reference rewritten to '{}'",
                scene.name(fixed.node).unwrap_or("")
            );
            Some(fixed)
        }
        None => {
            stats.nulled += 1;
            log::debug!("cross-reference had no surviving counterpart, nulled");
            None
        }
    }
}

/// Tries progressively shorter trailing sub-paths of the (root-first) name
/// path as child-by-name walks from the avatar root, most specific first,
/// then falls back to a plain depth-first search for the leaf name.
fn resolve_chain(
    scene: &Scene,
    avatar_root: NodeId,
    ctx: &mut MergeContext,
    chain: &[String],
) -> Option<NodeId> {
    let mut path = chain.to_vec();
    path.reverse();
    for start in 0..path.len() {
        let candidate = &path[start..];
        let hit = match ctx.cached_path(candidate) {
            Some(cached) => cached,
            None => {
                let found = scene.find_path(avatar_root, candidate);
                ctx.cache_path(candidate.to_vec(), found);
                found
            }
        };
        if hit.is_some() {
            return hit;
        }
    }
    scene.find_descendant(avatar_root, chain.first()?)
}

fn has_component(scene: &Scene, swept: SweptNode<'_>, node: NodeId, kind: ComponentKind) -> bool {
    if node == swept.id {
        return swept.kinds.contains(&kind);
    }
    scene
        .node(node)
        .is_some_and(|n| n.components.iter().any(|c| c.kind() == kind))
}
