//! Errors raised while building, preparing and advising routes.

use thiserror::Error;

/// Configuration errors; all of them are fatal for the advice call that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdviceError {
  #[error("cannot advise route as there are no routes")]
  NoRoutes,
  #[error("cannot advise route as route with id: {0} does not exist")]
  RouteNotFound(String),
  #[error("cannot advise route at index {index} as there are only {size} routes")]
  RouteIndexOutOfBounds { index: usize, size: usize },
  #[error(
    "you can not advice with error handlers; remove the error handler from the advice builder or \
     make it match the context default ({0})"
  )]
  ErrorHandlerNotSupported(String),
  #[error("you can not advice with new routes; the advice builder defines {0} route(s)")]
  NewRoutesNotSupported(usize),
  #[error("there are no outputs which matches: {match_by} in the route: {route}")]
  NoMatch { match_by: String, route: String },
  #[error("route builder error: {0}")]
  Dsl(String),
  #[error("invalid route: {0}")]
  InvalidRoute(String),
  #[error("duplicate id detected: {id}; ids must be unique across routes (route: {route})")]
  DuplicateNodeId { id: String, route: String },
  #[error("route with id: {0} already exists")]
  DuplicateRouteId(String),
  #[error("invalid advice plan: {0}")]
  Plan(String),
}

/// Failure to render a route into a diagnostic text form.
#[derive(Error, Debug)]
pub enum DumpError {
  #[error("xml serialization error: {0}")]
  Xml(#[from] quick_xml::se::SeError),
  #[error("json serialization error: {0}")]
  Json(#[from] serde_json::Error),
}

/// Result alias for advice operations.
pub type Result<T> = std::result::Result<T, AdviceError>;
