//! Declarative route: one input and a list of processor definitions.

use serde::{Deserialize, Serialize};

use super::ProcessorDefinition;

/// Declarative route as built by [crate::RouteBuilder] or read from a routes file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub route_id: Option<String>,
  /// Input endpoint uri.
  pub from: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Error handler reference; `None` inherits the context default.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_handler: Option<String>,
  #[serde(default)]
  pub outputs: Vec<ProcessorDefinition>,
}

impl RouteSpec {
  pub fn new(from: impl Into<String>) -> Self {
    Self {
      route_id: None,
      from: from.into(),
      description: None,
      error_handler: None,
      outputs: Vec::new(),
    }
  }
}
