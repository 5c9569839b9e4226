//! Live, mutable route tree.
//!
//! Nodes live in an arena owned by the route and are addressed by [NodeId]. The tree owns
//! nodes top-down through the `outputs` lists; `parent` is a plain back-reference that is set
//! explicitly on every splice. Removed nodes stay in the arena, detached and unreachable.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Expression, NodeKind, ProcessorDefinition, RouteSpec};

/// Index of a node inside its owning [RouteDefinition].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Owner of an outputs list: the route itself or another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
  Route,
  Node(NodeId),
}

/// One processor node of a live route.
#[derive(Debug, Clone)]
pub struct ProcessorNode {
  pub kind: NodeKind,
  pub id: Option<String>,
  /// False when the id was synthesized rather than assigned by the user.
  pub custom_id: bool,
  pub uri: Option<String>,
  pub expression: Option<Expression>,
  pub reference: Option<String>,
  parent: Option<Parent>,
  outputs: Vec<NodeId>,
}

impl ProcessorNode {
  fn from_definition(def: &ProcessorDefinition) -> Self {
    Self {
      kind: def.kind,
      id: def.id.clone(),
      custom_id: def.id.is_some(),
      uri: def.uri.clone(),
      expression: def.expression.clone(),
      reference: def.reference.clone(),
      parent: None,
      outputs: Vec::new(),
    }
  }

  pub fn parent(&self) -> Option<Parent> {
    self.parent
  }

  pub fn outputs(&self) -> &[NodeId] {
    &self.outputs
  }

  pub fn is_abstract(&self) -> bool {
    self.kind.is_abstract()
  }
}

/// The single input of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromDefinition {
  pub uri: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
}

/// A route: one input and an arena-backed tree of outputs.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
  route_id: Option<String>,
  input: FromDefinition,
  description: Option<String>,
  error_handler: Option<String>,
  nodes: Vec<ProcessorNode>,
  outputs: Vec<NodeId>,
  prepared: bool,
}

impl RouteDefinition {
  /// Builds the live tree from a declarative route.
  pub fn from_spec(spec: RouteSpec) -> Self {
    let mut route = Self {
      route_id: spec.route_id,
      input: FromDefinition {
        uri: spec.from,
        id: None,
      },
      description: spec.description,
      error_handler: spec.error_handler,
      nodes: Vec::new(),
      outputs: Vec::new(),
      prepared: false,
    };
    for def in &spec.outputs {
      route.push(Parent::Route, def);
    }
    route
  }

  pub fn route_id(&self) -> Option<&str> {
    self.route_id.as_deref()
  }

  pub fn set_route_id(&mut self, id: impl Into<String>) {
    self.route_id = Some(id.into());
  }

  pub fn input(&self) -> &FromDefinition {
    &self.input
  }

  pub fn set_input_uri(&mut self, uri: impl Into<String>) {
    self.input.uri = uri.into();
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn error_handler(&self) -> Option<&str> {
    self.error_handler.as_deref()
  }

  /// Top-level outputs in execution order.
  pub fn outputs(&self) -> &[NodeId] {
    &self.outputs
  }

  /// Panics if `id` was not created by this route.
  pub fn node(&self, id: NodeId) -> &ProcessorNode {
    &self.nodes[id.0]
  }

  pub fn node_mut(&mut self, id: NodeId) -> &mut ProcessorNode {
    &mut self.nodes[id.0]
  }

  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.nodes[id.0].outputs
  }

  pub fn parent_of(&self, id: NodeId) -> Option<Parent> {
    self.nodes[id.0].parent
  }

  /// The outputs list owned by `parent`.
  pub fn outputs_of(&self, parent: Parent) -> &[NodeId] {
    match parent {
      Parent::Route => &self.outputs,
      Parent::Node(id) => &self.nodes[id.0].outputs,
    }
  }

  pub(crate) fn outputs_of_mut(&mut self, parent: Parent) -> &mut Vec<NodeId> {
    match parent {
      Parent::Route => &mut self.outputs,
      Parent::Node(id) => &mut self.nodes[id.0].outputs,
    }
  }

  pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<Parent>) {
    self.nodes[id.0].parent = parent;
  }

  /// Copies `def` (recursively) into the arena under `parent` without linking it into
  /// the parent's outputs; the caller splices the returned node.
  pub fn graft(&mut self, def: &ProcessorDefinition, parent: Parent) -> NodeId {
    let id = NodeId(self.nodes.len());
    let mut node = ProcessorNode::from_definition(def);
    node.parent = Some(parent);
    self.nodes.push(node);
    for child in &def.outputs {
      let child_id = self.graft(child, Parent::Node(id));
      self.nodes[id.0].outputs.push(child_id);
    }
    id
  }

  /// Grafts `def` and appends it to `parent`'s outputs.
  pub fn push(&mut self, parent: Parent, def: &ProcessorDefinition) -> NodeId {
    let id = self.graft(def, parent);
    self.outputs_of_mut(parent).push(id);
    id
  }

  /// Grafts `def` and inserts it at `index` in `parent`'s outputs (clamped to the end).
  pub fn insert(&mut self, parent: Parent, index: usize, def: &ProcessorDefinition) -> NodeId {
    let id = self.graft(def, parent);
    let list = self.outputs_of_mut(parent);
    let index = index.min(list.len());
    list.insert(index, id);
    id
  }

  /// Unlinks the node at `index` of `parent`'s outputs and detaches it.
  pub fn remove_at(&mut self, parent: Parent, index: usize) -> Option<NodeId> {
    let list = self.outputs_of_mut(parent);
    if index >= list.len() {
      return None;
    }
    let id = list.remove(index);
    self.nodes[id.0].parent = None;
    Some(id)
  }

  /// Unlinks `id` from whichever list holds it. Returns false if it was already detached.
  pub fn detach(&mut self, id: NodeId) -> bool {
    let Some(parent) = self.nodes[id.0].parent else {
      return false;
    };
    let position = self.outputs_of(parent).iter().position(|n| *n == id);
    match position {
      Some(index) => self.remove_at(parent, index).is_some(),
      None => {
        self.nodes[id.0].parent = None;
        false
      }
    }
  }

  /// Every node below `id`, depth-first pre-order, excluding `id` itself.
  pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
    self.walk(&self.nodes[id.0].outputs)
  }

  /// Deep copy of the subtree rooted at `id` as a declarative definition.
  pub fn extract(&self, id: NodeId) -> ProcessorDefinition {
    let node = &self.nodes[id.0];
    ProcessorDefinition {
      kind: node.kind,
      id: if node.custom_id { node.id.clone() } else { None },
      uri: node.uri.clone(),
      expression: node.expression.clone(),
      reference: node.reference.clone(),
      outputs: node.outputs.iter().map(|c| self.extract(*c)).collect(),
    }
  }

  /// Stable string rendering of the subtree rooted at `id` (e.g. `To[mock:a]`).
  pub fn describe(&self, id: NodeId) -> String {
    self.extract(id).to_string()
  }

  /// All nodes reachable from `roots`, depth-first pre-order.
  pub fn walk(&self, roots: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::new();
    for root in roots {
      self.walk_into(*root, &mut out);
    }
    out
  }

  fn walk_into(&self, id: NodeId, out: &mut Vec<NodeId>) {
    out.push(id);
    for child in &self.nodes[id.0].outputs {
      self.walk_into(*child, out);
    }
  }

  /// All nodes reachable from the route outputs, depth-first pre-order.
  pub fn reachable(&self) -> Vec<NodeId> {
    self.walk(&self.outputs)
  }

  /// Recomputes every parent pointer from the child lists; unreachable nodes end up detached.
  pub fn init_parent(&mut self) {
    for node in &mut self.nodes {
      node.parent = None;
    }
    let top = self.outputs.clone();
    for id in top {
      self.init_parent_from(id, Parent::Route);
    }
  }

  fn init_parent_from(&mut self, id: NodeId, parent: Parent) {
    self.nodes[id.0].parent = Some(parent);
    let children = self.nodes[id.0].outputs.clone();
    for child in children {
      self.init_parent_from(child, Parent::Node(id));
    }
  }

  /// Declarative copy of the whole route.
  pub fn to_spec(&self) -> RouteSpec {
    RouteSpec {
      route_id: self.route_id.clone(),
      from: self.input.uri.clone(),
      description: self.description.clone(),
      error_handler: self.error_handler.clone(),
      outputs: self.outputs.iter().map(|id| self.extract(*id)).collect(),
    }
  }

  /// `(kind, id)` sequence of `parent`'s outputs; handy to compare shapes.
  pub fn shape_of(&self, parent: Parent) -> Vec<(NodeKind, Option<String>)> {
    self
      .outputs_of(parent)
      .iter()
      .map(|id| {
        let n = &self.nodes[id.0];
        (n.kind, n.id.clone())
      })
      .collect()
  }

  pub fn is_prepared(&self) -> bool {
    self.prepared
  }

  pub fn mark_prepared(&mut self) {
    self.prepared = true;
  }

  pub fn mark_unprepared(&mut self) {
    self.prepared = false;
  }

  /// Human readable name used in log and error messages.
  pub fn display_name(&self) -> String {
    match &self.route_id {
      Some(id) => format!("{}[{}]", id, self.input.uri),
      None => format!("Route[{}]", self.input.uri),
    }
  }
}

impl From<RouteSpec> for RouteDefinition {
  fn from(spec: RouteSpec) -> Self {
    RouteDefinition::from_spec(spec)
  }
}
