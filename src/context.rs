//! Route registry consumed by the advice engine, and an in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AdviceError, Result};
use crate::route_helper;
use crate::types::{RouteDefinition, RouteSpec};

/// Environment variable that turns route dumps on (`1` or `true`).
pub const DUMP_ROUTES_ENV: &str = "ROUTEWEAVE_DUMP_ROUTES";

/// Knobs of an advice call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceOptions {
  /// Log the route as XML before and after advice.
  pub dump_routes: bool,
  /// Start the merged route when the context is running.
  pub start_advised_routes: bool,
}

impl Default for AdviceOptions {
  fn default() -> Self {
    Self {
      dump_routes: false,
      start_advised_routes: true,
    }
  }
}

impl AdviceOptions {
  /// Defaults, with `dump_routes` taken from the environment when set.
  pub fn from_env() -> Self {
    let mut options = Self::default();
    if let Ok(value) = std::env::var(DUMP_ROUTES_ENV) {
      options.dump_routes = parse_flag(&value);
    }
    options
  }
}

/// Reads `1`, `true` or `yes` (any case) as set.
pub fn parse_flag(value: &str) -> bool {
  matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Lifecycle state of a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteStatus {
  Stopped,
  Started,
}

/// What the advice engine needs from the model registry that owns the routes.
pub trait RouteRegistry {
  /// Registered routes in order.
  fn route_definitions(&self) -> &[RouteDefinition];

  fn find_route_by_id(&self, id: &str) -> Option<&RouteDefinition> {
    self
      .route_definitions()
      .iter()
      .find(|r| r.route_id() == Some(id))
  }

  /// Stops and unregisters the route.
  fn remove_route(&mut self, id: &str) -> Option<RouteDefinition>;

  /// Registers `route` at the front of the route list.
  fn add_route_first(&mut self, route: RouteDefinition) -> Result<()>;

  /// True once the registry is running.
  fn is_started(&self) -> bool;

  fn start_route(&mut self, id: &str) -> Result<()>;

  /// Error handler reference every route inherits unless it declares its own.
  fn default_error_handler(&self) -> Option<&str>;

  fn options(&self) -> AdviceOptions;
}

/// In-memory route registry.
#[derive(Debug, Clone, Default)]
pub struct ModelContext {
  routes: Vec<RouteDefinition>,
  statuses: HashMap<String, RouteStatus>,
  started: bool,
  default_error_handler: Option<String>,
  options: AdviceOptions,
  route_counter: usize,
}

impl ModelContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_options(mut self, options: AdviceOptions) -> Self {
    self.options = options;
    self
  }

  pub fn with_default_error_handler(mut self, reference: impl Into<String>) -> Self {
    self.default_error_handler = Some(reference.into());
    self
  }

  pub fn set_options(&mut self, options: AdviceOptions) {
    self.options = options;
  }

  fn next_route_id(&mut self) -> String {
    loop {
      self.route_counter += 1;
      let id = format!("route{}", self.route_counter);
      if self.find_route_by_id(&id).is_none() {
        return id;
      }
    }
  }

  /// Prepares and registers a route at the end; started at once if the context runs.
  ///
  /// Returns the route id, generated (`route1`, `route2`, ...) when the route declares none.
  pub fn add_route(&mut self, spec: RouteSpec) -> Result<String> {
    let mut route = RouteDefinition::from_spec(spec);
    let id = match route.route_id() {
      Some(id) => id.to_string(),
      None => {
        let id = self.next_route_id();
        route.set_route_id(id.clone());
        id
      }
    };
    if self.find_route_by_id(&id).is_some() {
      return Err(AdviceError::DuplicateRouteId(id));
    }
    if let Some(clash) = route_helper::validate_unique_ids(&route, &self.routes) {
      return Err(AdviceError::DuplicateNodeId { id: clash, route: id });
    }
    route_helper::prepare_route(&mut route)?;
    self.routes.push(route);
    self.statuses.insert(id.clone(), RouteStatus::Stopped);
    debug!(route_id = %id, "route added");
    if self.started {
      self.start_route(&id)?;
    }
    Ok(id)
  }

  pub fn add_routes(&mut self, specs: impl IntoIterator<Item = RouteSpec>) -> Result<Vec<String>> {
    specs.into_iter().map(|spec| self.add_route(spec)).collect()
  }

  /// Starts the context and every registered route.
  pub fn start(&mut self) -> Result<()> {
    self.started = true;
    let ids: Vec<String> = self
      .routes
      .iter()
      .filter_map(|r| r.route_id().map(str::to_string))
      .collect();
    for id in ids {
      self.start_route(&id)?;
    }
    info!(routes = self.routes.len(), "context started");
    Ok(())
  }

  /// Stops every route and the context.
  pub fn stop(&mut self) {
    for status in self.statuses.values_mut() {
      *status = RouteStatus::Stopped;
    }
    self.started = false;
    info!("context stopped");
  }

  pub fn route_status(&self, id: &str) -> Option<RouteStatus> {
    self.statuses.get(id).copied()
  }
}

impl RouteRegistry for ModelContext {
  fn route_definitions(&self) -> &[RouteDefinition] {
    &self.routes
  }

  fn remove_route(&mut self, id: &str) -> Option<RouteDefinition> {
    let index = self.routes.iter().position(|r| r.route_id() == Some(id))?;
    self.statuses.remove(id);
    debug!(route_id = %id, "route stopped and removed");
    Some(self.routes.remove(index))
  }

  fn add_route_first(&mut self, route: RouteDefinition) -> Result<()> {
    let id = route.route_id().map(str::to_string);
    if let Some(id) = &id {
      if self.find_route_by_id(id).is_some() {
        return Err(AdviceError::DuplicateRouteId(id.clone()));
      }
      self.statuses.insert(id.clone(), RouteStatus::Stopped);
    }
    self.routes.insert(0, route);
    Ok(())
  }

  fn is_started(&self) -> bool {
    self.started
  }

  fn start_route(&mut self, id: &str) -> Result<()> {
    match self.statuses.get_mut(id) {
      Some(status) => {
        *status = RouteStatus::Started;
        debug!(route_id = %id, "route started");
        Ok(())
      }
      None => Err(AdviceError::RouteNotFound(id.to_string())),
    }
  }

  fn default_error_handler(&self) -> Option<&str> {
    self.default_error_handler.as_deref()
  }

  fn options(&self) -> AdviceOptions {
    self.options
  }
}
