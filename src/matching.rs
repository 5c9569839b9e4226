//! Walks a route and collects the nodes a match-by strategy accepts.
//!
//! Candidates are the route's top-level outputs with transaction boundaries unwrapped into
//! their children. For first/last selection a leading run of abstract nodes is skipped so
//! that "first" means the first functional step. The candidates are then flattened depth-first
//! up to the selection's depth bound and filtered by the predicate.

use tracing::{instrument, trace};

use crate::match_by::MatchBy;
use crate::selector::Selection;
use crate::types::{NodeId, NodeKind, RouteDefinition};

/// Top-level candidates before flattening.
pub fn candidates(route: &RouteDefinition, selection: &Selection) -> Vec<NodeId> {
  let mut out = Vec::new();
  for id in route.outputs() {
    if route.node(*id).kind == NodeKind::Transacted {
      out.extend_from_slice(route.children(*id));
    } else {
      out.push(*id);
    }
  }
  if selection.is_first_or_last() {
    let skip = out
      .iter()
      .take_while(|id| route.node(**id).is_abstract())
      .count();
    out.drain(..skip);
  }
  out
}

/// Depth-first pre-order flattening of `roots`; `roots` are depth 1.
pub fn flatten(route: &RouteDefinition, roots: &[NodeId], selection: &Selection) -> Vec<NodeId> {
  let mut out = Vec::new();
  for id in roots {
    flatten_into(route, *id, 1, selection, &mut out);
  }
  out
}

fn flatten_into(
  route: &RouteDefinition,
  id: NodeId,
  depth: usize,
  selection: &Selection,
  out: &mut Vec<NodeId>,
) {
  out.push(id);
  if !selection.within_depth(depth + 1) {
    return;
  }
  for child in route.children(id) {
    flatten_into(route, *child, depth + 1, selection, out);
  }
}

/// Every node accepted by `match_by`, in traversal order.
#[instrument(level = "trace", skip(route, match_by, selection), fields(match_by = %match_by))]
pub fn find_matches(route: &RouteDefinition, match_by: &MatchBy, selection: &Selection) -> Vec<NodeId> {
  let roots = candidates(route, selection);
  let matches: Vec<NodeId> = flatten(route, &roots, selection)
    .into_iter()
    .filter(|id| match_by.matches(route, *id))
    .collect();
  trace!(match_by = %match_by, count = matches.len(), "collected matches");
  matches
}
