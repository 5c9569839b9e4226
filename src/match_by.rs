//! Strategies deciding whether a single node is a weave target.

use std::fmt;

use crate::pattern::GlobPattern;
use crate::types::{NodeId, NodeType, RouteDefinition};

/// Pure node predicate plus a display id used in log and error messages.
#[derive(Debug, Clone)]
pub enum MatchBy {
  /// Glob over the node id; the lone `*` matches every node, even one without an id.
  Id(GlobPattern),
  /// Glob over the node's string rendering.
  ToString(GlobPattern),
  /// Glob over the destination uri of endpoint-sending nodes.
  ToUri(GlobPattern),
  /// The node's category is the given type or a subtype of it.
  Type(NodeType),
}

impl MatchBy {
  pub fn by_id(pattern: impl Into<String>) -> Self {
    MatchBy::Id(GlobPattern::new(pattern))
  }

  pub fn by_to_string(pattern: impl Into<String>) -> Self {
    MatchBy::ToString(GlobPattern::new(pattern))
  }

  pub fn by_to_uri(pattern: impl Into<String>) -> Self {
    MatchBy::ToUri(GlobPattern::new(pattern))
  }

  pub fn by_type(ty: impl Into<NodeType>) -> Self {
    MatchBy::Type(ty.into())
  }

  /// Display id, e.g. `id: b1` or `type: ToDefinition`.
  pub fn id(&self) -> String {
    self.to_string()
  }

  pub fn matches(&self, route: &RouteDefinition, node: NodeId) -> bool {
    let n = route.node(node);
    match self {
      MatchBy::Id(pattern) => {
        pattern.is_match_all() || n.id.as_deref().is_some_and(|id| pattern.matches(id))
      }
      MatchBy::ToString(pattern) => pattern.matches(&route.describe(node)),
      MatchBy::ToUri(pattern) => {
        n.kind.sends_to_endpoint() && n.uri.as_deref().is_some_and(|uri| pattern.matches(uri))
      }
      MatchBy::Type(ty) => n.kind.is_a(*ty),
    }
  }
}

impl fmt::Display for MatchBy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MatchBy::Id(p) => write!(f, "id: {}", p.as_str()),
      MatchBy::ToString(p) => write!(f, "toString: {}", p.as_str()),
      MatchBy::ToUri(p) => write!(f, "toUri: {}", p.as_str()),
      MatchBy::Type(ty) => write!(f, "type: {}", ty),
    }
  }
}
