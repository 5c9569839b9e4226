//! Route preparation and id/endpoint bookkeeping shared by the context and the advice engine.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{AdviceError, Result};
use crate::types::{NodeId, Parent, RouteDefinition};

static ENDPOINT_URI: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S").expect("endpoint uri regex is valid")
});

/// Recomputes every parent pointer of `route` from its child lists.
pub fn init_parent(route: &mut RouteDefinition) {
  route.init_parent();
}

/// Reorders, validates and marks `route` prepared.
///
/// Cross-cutting nodes move to the front in declaration order; the rest keep their order.
#[instrument(level = "trace", skip(route), fields(route = %route.display_name()))]
pub fn prepare_route(route: &mut RouteDefinition) -> Result<()> {
  let (upper, lower): (Vec<NodeId>, Vec<NodeId>) = route
    .outputs()
    .iter()
    .copied()
    .partition(|id| route.node(*id).kind.is_cross_cutting());
  let top = route.outputs_of_mut(Parent::Route);
  top.clear();
  top.extend(upper);
  top.extend(lower);
  route.init_parent();

  validate_top_level(route)?;
  sanity_check_route(route)?;
  route.mark_prepared();
  debug!(route = %route.display_name(), outputs = route.outputs().len(), "route prepared");
  Ok(())
}

/// Rejects top-level-only nodes nested anywhere below the route.
pub fn validate_top_level(route: &RouteDefinition) -> Result<()> {
  for id in route.reachable() {
    let node = route.node(id);
    if node.kind.is_top_level_only() && node.parent() != Some(Parent::Route) {
      return Err(AdviceError::InvalidRoute(format!(
        "the output must be added as top-level on the route; try moving {} to the top of route",
        route.describe(id)
      )));
    }
  }
  Ok(())
}

/// The route has a usable input uri and at least one output.
pub fn sanity_check_route(route: &RouteDefinition) -> Result<()> {
  let name = route.route_id().unwrap_or("Route");
  let uri = route.input().uri.trim();
  if uri.is_empty() {
    return Err(AdviceError::InvalidRoute(format!("{} has no inputs", name)));
  }
  if !ENDPOINT_URI.is_match(uri) {
    return Err(AdviceError::InvalidRoute(format!(
      "{} has an invalid input uri: {}",
      name, uri
    )));
  }
  if route.outputs().is_empty() {
    return Err(AdviceError::InvalidRoute(format!(
      "{} has no outputs; add at least one output to the route",
      name
    )));
  }
  Ok(())
}

/// Ids in `route`, pre-order and without duplicates.
///
/// With `include_abstract == false` cross-cutting subtrees are skipped entirely and wrapper
/// nodes (`transacted`, `policy`) contribute only their children.
pub fn gather_all_node_ids(
  route: &RouteDefinition,
  only_custom: bool,
  include_abstract: bool,
) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  for id in route.outputs() {
    gather_ids(route, *id, only_custom, include_abstract, &mut seen, &mut out);
  }
  out
}

fn gather_ids(
  route: &RouteDefinition,
  id: NodeId,
  only_custom: bool,
  include_abstract: bool,
  seen: &mut HashSet<String>,
  out: &mut Vec<String>,
) {
  let node = route.node(id);
  if !include_abstract && node.kind.is_cross_cutting() {
    return;
  }
  let counts = include_abstract || !node.kind.wraps_entire_output();
  if let Some(node_id) = &node.id {
    if counts && (!only_custom || node.custom_id) && seen.insert(node_id.clone()) {
      out.push(node_id.clone());
    }
  }
  for child in route.children(id) {
    gather_ids(route, *child, only_custom, include_abstract, seen, out);
  }
}

/// First custom, non-abstract id of `target` that another route in `routes` also uses.
///
/// `target` itself is skipped when it appears in `routes` (matched by route id).
pub fn validate_unique_ids(target: &RouteDefinition, routes: &[RouteDefinition]) -> Option<String> {
  let mut others = HashSet::new();
  for route in routes {
    if route.route_id().is_some() && route.route_id() == target.route_id() {
      continue;
    }
    others.extend(gather_all_node_ids(route, true, false));
  }
  gather_all_node_ids(target, true, false)
    .into_iter()
    .find(|id| others.contains(id))
}

/// Endpoint uris the route uses, normalized and sorted.
pub fn gather_all_endpoint_uris(
  route: &RouteDefinition,
  include_input: bool,
  include_outputs: bool,
) -> BTreeSet<String> {
  let mut out = BTreeSet::new();
  if include_input {
    out.extend(normalize_uri(&route.input().uri));
  }
  if include_outputs {
    for id in route.reachable() {
      let node = route.node(id);
      if !node.kind.sends_to_endpoint() {
        continue;
      }
      if let Some(uri) = node.uri.as_deref().and_then(normalize_uri) {
        out.insert(uri);
      }
    }
  }
  out
}

/// Trims whitespace and a dangling `?`; `None` for an empty uri.
pub fn normalize_uri(uri: &str) -> Option<String> {
  let uri = uri.trim().trim_end_matches('?');
  (!uri.is_empty()).then(|| uri.to_string())
}

/// True if the route has at least one output.
///
/// With `exclude_abstract` cross-cutting nodes do not count and wrapper nodes are looked through.
pub fn has_outputs(route: &RouteDefinition, exclude_abstract: bool) -> bool {
  has_outputs_in(route, route.outputs(), exclude_abstract)
}

fn has_outputs_in(route: &RouteDefinition, outputs: &[NodeId], exclude_abstract: bool) -> bool {
  if outputs.is_empty() {
    return false;
  }
  if !exclude_abstract {
    return true;
  }
  for id in outputs {
    let kind = route.node(*id).kind;
    if kind.wraps_entire_output() {
      return has_outputs_in(route, route.children(*id), exclude_abstract);
    }
    if !kind.is_abstract() {
      return true;
    }
  }
  false
}

/// Gives every node without an id a synthesized one (`to1`, `log2`, ...).
///
/// One counter is shared by the whole route and skips values that would collide with ids
/// already present. Custom ids are left untouched.
pub fn force_assign_ids(route: &mut RouteDefinition) {
  let mut taken: HashSet<String> = route
    .reachable()
    .into_iter()
    .filter_map(|id| route.node(id).id.clone())
    .collect();
  let mut counter = 0usize;
  for id in route.reachable() {
    if route.node(id).id.is_some() {
      continue;
    }
    let short = route.node(id).kind.short_name();
    let generated = loop {
      counter += 1;
      let candidate = format!("{}{}", short, counter);
      if !taken.contains(&candidate) {
        break candidate;
      }
    };
    taken.insert(generated.clone());
    let node = route.node_mut(id);
    node.id = Some(generated);
    node.custom_id = false;
  }
}
