use crate::component::Component;
use glam::{Quat, Vec3};

/// Local or world TRS transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Transform {
        Transform {
            position,
            ..Transform::IDENTITY
        }
    }

    /// Composes `self` (the parent world transform) with a child local
    /// transform. Shear introduced by rotated non-uniform scale is not
    /// representable in TRS and is folded into scale, as is usual for
    /// skeleton math.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale * child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// The local transform that, composed under `parent`, reproduces `self`.
    /// Zero parent scale components map to zero rather than dividing.
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv_rotation = parent.rotation.inverse();
        Transform {
            position: safe_div(inv_rotation * (self.position - parent.position), parent.scale),
            rotation: inv_rotation * self.rotation,
            scale: safe_div(self.scale, parent.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

fn safe_div(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::select(b.cmpeq(Vec3::ZERO), Vec3::ZERO, a / b)
}

/// Handle to a node in a [`Scene`]. Handles outlive their node; looking up a
/// destroyed handle yields `None` instead of another node that reused the
/// slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub local: Transform,
    pub components: Vec<Component>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> SceneNode {
        SceneNode {
            name,
            local: Transform::IDENTITY,
            components: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Generational-arena scene graph. Parent/child links are kept mutually
/// consistent by the mutation methods; roots have no parent.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(SceneNode::new(name.into(), None))
    }

    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        if !self.contains(parent) {
            panic!("add_child: parent node is destroyed");
        }
        let id = self.insert(SceneNode::new(name.into(), Some(parent)));
        self.node_raw_mut(parent).children.push(id);
        id
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn node_raw_mut(&mut self, id: NodeId) -> &mut SceneNode {
        match self.node_mut(id) {
            Some(node) => node,
            None => panic!("node handle is destroyed"),
        }
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn add_component(&mut self, id: NodeId, component: Component) {
        self.node_raw_mut(id).components.push(component);
    }

    /// World transform of `id`, composed root-down.
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.node(id)?;
        match node.parent {
            Some(parent) => Some(self.world_transform(parent)?.compose(&node.local)),
            None => Some(node.local),
        }
    }

    /// The root above `id` (or `id` itself when it is a root).
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        self.node(current)?;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Some(current)
    }

    /// True when `id` is `root` or lies anywhere beneath it.
    pub fn is_under(&self, id: NodeId, root: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == root {
                return true;
            }
            current = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    /// Node names from `id` up to its root, leaf first.
    pub fn name_chain(&self, id: NodeId) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.node(c) else { break };
            chain.push(node.name.clone());
            current = node.parent;
        }
        chain
    }

    /// Preorder depth-first listing of `root` and everything beneath it.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// First node named `name` under `root` (inclusive) in depth-first
    /// order. First match wins; with duplicate names this is traversal
    /// order, not the shallowest or otherwise best match.
    pub fn find_descendant(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.name(id) == Some(name))
    }

    /// Child-by-name walk starting below `root`; `path` does not include the
    /// root's own name.
    pub fn find_path(&self, root: NodeId, path: &[String]) -> Option<NodeId> {
        let mut current = root;
        for segment in path {
            let node = self.node(current)?;
            current = node
                .children
                .iter()
                .copied()
                .find(|&c| self.name(c) == Some(segment.as_str()))?;
        }
        if current == root { None } else { Some(current) }
    }

    /// Detaches `id` from its current parent and attaches it under
    /// `new_parent`, keeping the local transform as-is.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) {
        if !self.contains(id) || !self.contains(new_parent) {
            return;
        }
        if self.is_under(new_parent, id) {
            panic!("reparent: new parent lies inside the moved subtree");
        }
        self.detach(id);
        self.node_raw_mut(new_parent).children.push(id);
        self.node_raw_mut(id).parent = Some(new_parent);
    }

    /// Reparents `id` under `new_parent`, recomputing the local transform so
    /// the node's world transform is preserved.
    pub fn reparent_keep_world(&mut self, id: NodeId, new_parent: NodeId) {
        let Some(world) = self.world_transform(id) else {
            return;
        };
        let Some(parent_world) = self.world_transform(new_parent) else {
            return;
        };
        self.reparent(id, new_parent);
        self.node_raw_mut(id).local = world.relative_to(&parent_world);
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        self.node_raw_mut(parent).children.retain(|&c| c != id);
        self.node_raw_mut(id).parent = None;
    }

    /// Destroys `id` and everything still attached beneath it. Slots are
    /// recycled with a bumped generation, so stale handles go dead rather
    /// than aliasing. Returns the number of nodes destroyed.
    pub fn destroy_subtree(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.detach(id);
        let doomed = self.descendants(id);
        for node in &doomed {
            let slot = &mut self.slots[node.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index);
        }
        doomed.len()
    }
}
