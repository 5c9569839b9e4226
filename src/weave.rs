//! Structural edits applied to the nodes a match-by strategy selects.
//!
//! Each target is edited in its effective outputs list:
//! - cross-cutting nodes (`intercept*`, `onException`, `onCompletion`) live in the route's
//!   top-level outputs;
//! - a node whose parent is a `choice` edits its own outputs;
//! - otherwise the parent's outputs, unless every sibling there is abstract, in which case the
//!   body sits inside the last abstract sibling and that sibling's outputs are used.
//!
//! A target that is not found in its effective list is skipped. Zero edits is an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{AdviceError, Result};
use crate::match_by::MatchBy;
use crate::matching::find_matches;
use crate::selector::{Selection, select};
use crate::types::{NodeId, NodeKind, Parent, ProcessorDefinition, RouteDefinition};

/// What to do at each selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaveAction {
  Replace,
  Remove,
  Before,
  After,
}

impl WeaveAction {
  pub fn name(self) -> &'static str {
    match self {
      WeaveAction::Replace => "replace",
      WeaveAction::Remove => "remove",
      WeaveAction::Before => "before",
      WeaveAction::After => "after",
    }
  }
}

/// Owner of the outputs list in which `node` is edited, or `None` for a detached node.
pub fn effective_outputs(route: &RouteDefinition, node: NodeId) -> Option<Parent> {
  let n = route.node(node);
  if n.kind.is_cross_cutting() {
    return Some(Parent::Route);
  }
  let parent = n.parent()?;
  if matches!(parent, Parent::Node(p) if route.node(p).kind == NodeKind::Choice) {
    return Some(Parent::Node(node));
  }
  let siblings = route.outputs_of(parent);
  if !siblings.is_empty() && siblings.iter().all(|s| route.node(*s).is_abstract()) {
    return siblings.last().map(|last| Parent::Node(*last));
  }
  Some(parent)
}

/// Applies `action` to every node picked by `match_by` and `selection`.
///
/// `replacement` is flattened (several nodes become one pipeline) and grafted anew at every
/// edit site. Returns the number of edited nodes.
#[instrument(
  level = "trace",
  skip(route, match_by, selection, action, replacement),
  fields(route = %route.display_name(), match_by = %match_by, action = action.name())
)]
pub fn weave(
  route: &mut RouteDefinition,
  match_by: &MatchBy,
  selection: &Selection,
  action: WeaveAction,
  replacement: &[ProcessorDefinition],
) -> Result<usize> {
  let matches = find_matches(route, match_by, selection);
  let flattened = ProcessorDefinition::flatten(replacement.to_vec());
  let mut edited = 0;

  for target in select(matches, selection) {
    let Some(owner) = effective_outputs(route, target) else {
      debug!(node = %target, "skipping detached node");
      continue;
    };
    let Some(index) = route.outputs_of(owner).iter().position(|n| *n == target) else {
      debug!(node = %target, "node not found in its effective outputs");
      continue;
    };
    let before = route.describe(target);
    match action {
      WeaveAction::Replace => {
        route.remove_at(owner, index);
        if let Some(def) = &flattened {
          route.insert(owner, index, def);
        }
      }
      WeaveAction::Remove => {
        route.remove_at(owner, index);
      }
      WeaveAction::Before => {
        if let Some(def) = &flattened {
          route.insert(owner, index, def);
        }
      }
      WeaveAction::After => {
        if let Some(def) = &flattened {
          route.insert(owner, index + 1, def);
        }
      }
    }
    edited += 1;
    info!(
      action = action.name(),
      match_by = %match_by,
      node = %before,
      with = ?flattened.as_ref().map(|d| d.to_string()),
      "advice"
    );
  }

  if edited == 0 {
    return Err(AdviceError::NoMatch {
      match_by: match_by.id(),
      route: route.display_name(),
    });
  }
  Ok(edited)
}
