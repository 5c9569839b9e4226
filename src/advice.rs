//! The advice-with orchestrator: detach a route, apply the recorded edits, put it back.

use tracing::{debug, info, instrument};

use crate::advice_builder::AdviceWithBuilder;
use crate::context::RouteRegistry;
use crate::dump::dump_route_as_xml;
use crate::error::{AdviceError, Result};
use crate::route_helper;
use crate::types::RouteDefinition;

/// Which route an advice call edits.
#[derive(Debug, Clone)]
pub enum RouteLookup {
  /// The first registered route.
  First,
  Id(String),
  Index(usize),
  /// A route handed over directly; a registered route with the same id is replaced.
  /// A route without an id cannot be advised.
  Definition(RouteDefinition),
}

impl From<&str> for RouteLookup {
  fn from(id: &str) -> Self {
    RouteLookup::Id(id.to_string())
  }
}

impl From<String> for RouteLookup {
  fn from(id: String) -> Self {
    RouteLookup::Id(id)
  }
}

impl From<usize> for RouteLookup {
  fn from(index: usize) -> Self {
    RouteLookup::Index(index)
  }
}

impl From<RouteDefinition> for RouteLookup {
  fn from(route: RouteDefinition) -> Self {
    RouteLookup::Definition(route)
  }
}

fn lookup_route<R: RouteRegistry + ?Sized>(
  registry: &R,
  lookup: RouteLookup,
) -> Result<RouteDefinition> {
  let routes = registry.route_definitions();
  if routes.is_empty() {
    return Err(AdviceError::NoRoutes);
  }
  match lookup {
    RouteLookup::First => routes.first().cloned().ok_or(AdviceError::NoRoutes),
    RouteLookup::Id(id) => registry
      .find_route_by_id(&id)
      .cloned()
      .ok_or(AdviceError::RouteNotFound(id)),
    RouteLookup::Index(index) => {
      routes
        .get(index)
        .cloned()
        .ok_or(AdviceError::RouteIndexOutOfBounds {
          index,
          size: routes.len(),
        })
    }
    RouteLookup::Definition(route) => match route.route_id() {
      Some(_) => Ok(route),
      None => Err(AdviceError::RouteNotFound(route.display_name())),
    },
  }
}

fn validate_builder<R: RouteRegistry + ?Sized>(
  registry: &R,
  builder: &AdviceWithBuilder,
) -> Result<()> {
  if builder.new_route_count() > 0 {
    return Err(AdviceError::NewRoutesNotSupported(builder.new_route_count()));
  }
  if let Some(reference) = builder.declared_error_handler() {
    if registry.default_error_handler() != Some(reference) {
      return Err(AdviceError::ErrorHandlerNotSupported(reference.to_string()));
    }
  }
  Ok(())
}

fn log_dump(stage: &str, route: &RouteDefinition) {
  match dump_route_as_xml(route) {
    Ok(xml) => info!(stage, route = %route.display_name(), dump = %xml, "route dump"),
    Err(e) => debug!(stage, error = %e, "cannot dump route"),
  }
}

/// Edits one registered route with the tasks recorded by `configure`.
///
/// The route is detached from `registry`, every task runs in recording order, and the result
/// is prepared and registered again at the front. Returns the advised route. A failing task
/// leaves the route detached and partially edited.
#[instrument(level = "trace", skip(registry, lookup, configure))]
pub fn advice_with<R, F>(
  registry: &mut R,
  lookup: impl Into<RouteLookup>,
  configure: F,
) -> Result<RouteDefinition>
where
  R: RouteRegistry + ?Sized,
  F: FnOnce(&mut AdviceWithBuilder) -> Result<()>,
{
  let mut route = lookup_route(registry, lookup.into())?;
  let route_id = route.route_id().map(str::to_string);

  let mut builder = AdviceWithBuilder::new();
  configure(&mut builder)?;
  validate_builder(registry, &builder)?;
  let tasks = builder.build_tasks()?;
  info!(route = %route.display_name(), tasks = tasks.len(), "advising route");

  let options = registry.options();
  if options.dump_routes {
    log_dump("before", &route);
  }

  if let Some(id) = &route_id {
    registry.remove_route(id);
  }

  for (index, task) in tasks.iter().enumerate() {
    debug!(index, task = %task, "executing advice task");
    task.execute(&mut route)?;
  }

  route.init_parent();
  route.mark_unprepared();
  route_helper::prepare_route(&mut route)?;
  if let Some(clash) = route_helper::validate_unique_ids(&route, registry.route_definitions()) {
    return Err(AdviceError::DuplicateNodeId {
      id: clash,
      route: route.display_name(),
    });
  }
  registry.add_route_first(route.clone())?;

  if options.dump_routes {
    log_dump("after", &route);
  }

  if registry.is_started() && options.start_advised_routes {
    if let Some(id) = &route_id {
      registry.start_route(id)?;
    }
  }
  info!(route = %route.display_name(), "route advised");
  Ok(route)
}
