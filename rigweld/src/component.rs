use crate::scene::{NodeId, Scene, Transform};
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::Rc;

/// Discriminant for [`Component`], used where a reference must name a
/// component on a node rather than the node itself.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComponentKind {
    Skin,
    Constraint,
    Follow,
    Physics,
    Collider,
    Animator,
}

/// A behaviour attached to a scene node.
#[derive(Clone, Debug)]
pub enum Component {
    Skin(SkinnedSurface),
    Constraint(SourcedConstraint),
    Follow(FollowConstraint),
    Physics(PhysicsDriver),
    Collider(ColliderShape),
    Animator(AnimatorContainer),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Skin(_) => ComponentKind::Skin,
            Component::Constraint(_) => ComponentKind::Constraint,
            Component::Follow(_) => ComponentKind::Follow,
            Component::Physics(_) => ComponentKind::Physics,
            Component::Collider(_) => ComponentKind::Collider,
            Component::Animator(_) => ComponentKind::Animator,
        }
    }

    /// Runs `fix` over every node/component reference held in structured
    /// fields. Animator payloads are free-form [`Value`] graphs and are
    /// swept separately.
    pub(crate) fn remap_structured_refs(
        &mut self,
        fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>,
    ) {
        match self {
            Component::Skin(skin) => skin.remap_refs(fix),
            Component::Constraint(constraint) => constraint.remap_refs(fix),
            Component::Follow(follow) => follow.remap_refs(fix),
            Component::Physics(physics) => physics.remap_refs(fix),
            Component::Collider(_) => {}
            Component::Animator(_) => {}
        }
    }
}

/// Reference to a node, or to a component of a given kind on that node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectRef {
    pub node: NodeId,
    pub component: Option<ComponentKind>,
}

impl ObjectRef {
    pub fn node(node: NodeId) -> ObjectRef {
        ObjectRef {
            node,
            component: None,
        }
    }

    pub fn component(node: NodeId, kind: ComponentKind) -> ObjectRef {
        ObjectRef {
            node,
            component: Some(kind),
        }
    }
}

/// Rewrites the node references a value holds. `fix` returns the replacement
/// reference, or `None` to null the slot out.
pub(crate) trait RemapRefs {
    fn remap_refs(&mut self, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>);
}

fn fix_node(slot: &mut Option<NodeId>, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>) {
    if let Some(node) = *slot {
        *slot = fix(ObjectRef::node(node)).map(|r| r.node);
    }
}

/// Mesh deformed by a set of bones.
#[derive(Clone, Debug, Default)]
pub struct SkinnedSurface {
    /// Bone palette; entries are indexed by vertex weights and may be unset.
    pub bones: Vec<Option<NodeId>>,
    pub root_bone: Option<NodeId>,
}

impl RemapRefs for SkinnedSurface {
    fn remap_refs(&mut self, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>) {
        for bone in &mut self.bones {
            fix_node(bone, fix);
        }
        fix_node(&mut self.root_bone, fix);
    }
}

#[derive(Clone, Debug)]
pub struct ConstraintSource {
    pub transform: Option<NodeId>,
    pub weight: f32,
}

/// Constraint blending one or more weighted source transforms.
#[derive(Clone, Debug, Default)]
pub struct SourcedConstraint {
    pub sources: Vec<ConstraintSource>,
}

impl RemapRefs for SourcedConstraint {
    fn remap_refs(&mut self, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>) {
        for source in &mut self.sources {
            fix_node(&mut source.transform, fix);
        }
    }
}

/// Rigid attachment to a target node with a fixed local offset.
#[derive(Clone, Debug)]
pub struct FollowConstraint {
    pub target: Option<NodeId>,
    pub position_offset: Vec3,
    pub rotation_offset: Quat,
}

impl FollowConstraint {
    /// World transform the follower should take, or `None` when the target
    /// is unset or destroyed.
    pub fn solved_world(&self, scene: &Scene) -> Option<Transform> {
        let target = self.target?;
        let world = scene.world_transform(target)?;
        Some(world.compose(&Transform {
            position: self.position_offset,
            rotation: self.rotation_offset,
            scale: Vec3::ONE,
        }))
    }
}

impl RemapRefs for FollowConstraint {
    fn remap_refs(&mut self, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>) {
        fix_node(&mut self.target, fix);
    }
}

/// Secondary-motion simulation rooted at a bone chain.
#[derive(Clone, Debug, Default)]
pub struct PhysicsDriver {
    pub root: Option<NodeId>,
    pub ignored: Vec<NodeId>,
    pub colliders: Vec<ObjectRef>,
}

impl RemapRefs for PhysicsDriver {
    fn remap_refs(&mut self, fix: &mut dyn FnMut(ObjectRef) -> Option<ObjectRef>) {
        fix_node(&mut self.root, fix);
        self.ignored = std::mem::take(&mut self.ignored)
            .into_iter()
            .filter_map(|node| fix(ObjectRef::node(node)).map(|r| r.node))
            .collect();
        self.colliders = std::mem::take(&mut self.colliders)
            .into_iter()
            .filter_map(|collider| fix(collider))
            .collect();
    }
}

/// Capsule collider consumed by [`PhysicsDriver`]s.
#[derive(Clone, Debug)]
pub struct ColliderShape {
    pub radius: f32,
    pub height: f32,
}

/// Animation controller whose payload is a free-form property graph with
/// node references buried at arbitrary depth.
#[derive(Clone, Debug, Default)]
pub struct AnimatorContainer {
    pub layers: Value,
    pub parameters: Value,
}

pub type ObjectHandle = Rc<RefCell<ValueObject>>;

#[derive(Clone, Debug, Default)]
pub struct ValueObject {
    pub fields: Vec<(String, Value)>,
}

/// Dynamic property value. `Object`s are shared handles, so the graph may
/// contain cycles.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ref(ObjectRef),
    List(Vec<Value>),
    Object(ObjectHandle),
}

impl Value {
    pub fn object(fields: Vec<(String, Value)>) -> Value {
        Value::Object(Rc::new(RefCell::new(ValueObject { fields })))
    }
}
