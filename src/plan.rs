//! Declarative advice plans read from JSON.
//!
//! A plan names the route to advise and a list of steps; every step goes through the same
//! [AdviceWithBuilder] calls a hand-written configurer would make.
//!
//! ```json
//! {
//!   "route_id": "orders",
//!   "steps": [
//!     { "match": { "by_id": "b1" }, "action": "replace",
//!       "outputs": [ { "kind": "to", "uri": "mock:D", "id": "d1" } ] },
//!     { "match": { "by_to_uri": "mock:*" }, "select": { "last": true }, "action": "remove" },
//!     { "action": "add_last", "outputs": [ { "kind": "log", "expression": { "language": "simple", "text": "done" } } ] },
//!     { "action": "replace_from", "uri": "seda:orders" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::advice::{RouteLookup, advice_with};
use crate::advice_builder::AdviceWithBuilder;
use crate::context::RouteRegistry;
use crate::error::{AdviceError, Result};
use crate::match_by::MatchBy;
use crate::route_builder::{OutputsBuilder, ProcessorDsl};
use crate::selector::Selection;
use crate::types::{NodeKind, NodeType, ProcessorDefinition, RouteDefinition, RouteSpec};

/// Which nodes a step targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMatch {
  ById(String),
  ByToString(String),
  ByToUri(String),
  /// `any`, `send`, `expression`, `output`, `intercept`, or a node kind such as `choice`.
  ByType(String),
}

impl PlanMatch {
  pub fn to_match_by(&self) -> Result<MatchBy> {
    Ok(match self {
      PlanMatch::ById(p) => MatchBy::by_id(p.as_str()),
      PlanMatch::ByToString(p) => MatchBy::by_to_string(p.as_str()),
      PlanMatch::ByToUri(p) => MatchBy::by_to_uri(p.as_str()),
      PlanMatch::ByType(name) => MatchBy::by_type(parse_node_type(name)?),
    })
  }
}

/// Resolves a type name used in plans.
pub fn parse_node_type(name: &str) -> Result<NodeType> {
  match name {
    "any" => Ok(NodeType::Any),
    "send" => Ok(NodeType::Send),
    "expression" => Ok(NodeType::Expression),
    "output" => Ok(NodeType::Output),
    "intercept" => Ok(NodeType::Intercept),
    other => serde_json::from_value::<NodeKind>(serde_json::Value::String(other.to_string()))
      .map(NodeType::Kind)
      .map_err(|_| AdviceError::Plan(format!("unknown node type: {}", other))),
  }
}

/// Selection rules of a step; `index` and `range` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSelection {
  pub first: bool,
  pub last: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub index: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub range: Option<[usize; 2]>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_deep: Option<usize>,
}

impl PlanSelection {
  pub fn to_selection(&self) -> Result<Selection> {
    let (from, to) = match (self.index, self.range) {
      (Some(_), Some(_)) => {
        return Err(AdviceError::Plan(
          "index and range cannot be combined".to_string(),
        ));
      }
      (Some(i), None) => (Some(i), Some(i)),
      (None, Some([from, to])) => (Some(from), Some(to)),
      (None, None) => (None, None),
    };
    Ok(Selection {
      first: self.first,
      last: self.last,
      from,
      to,
      max_deep: self.max_deep,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
  Replace,
  Remove,
  Before,
  After,
  AddFirst,
  AddLast,
  ReplaceFrom,
}

/// One edit of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
  #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
  pub match_by: Option<PlanMatch>,
  #[serde(default)]
  pub select: PlanSelection,
  pub action: PlanAction,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub outputs: Vec<ProcessorDefinition>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uri: Option<String>,
}

fn fill(builder: &mut OutputsBuilder, outputs: &[ProcessorDefinition]) {
  for def in outputs {
    builder.add(def.clone());
  }
}

impl PlanStep {
  fn require_outputs(&self, index: usize) -> Result<()> {
    if self.outputs.is_empty() {
      return Err(AdviceError::Plan(format!(
        "step {}: {:?} requires outputs",
        index, self.action
      )));
    }
    Ok(())
  }

  /// Records this step on `builder`; `index` is used in error messages.
  pub fn configure(&self, index: usize, builder: &mut AdviceWithBuilder) -> Result<()> {
    match self.action {
      PlanAction::AddFirst => {
        self.require_outputs(index)?;
        fill(builder.weave_add_first(), &self.outputs);
      }
      PlanAction::AddLast => {
        self.require_outputs(index)?;
        fill(builder.weave_add_last(), &self.outputs);
      }
      PlanAction::ReplaceFrom => {
        let uri = self.uri.as_deref().ok_or_else(|| {
          AdviceError::Plan(format!("step {}: replace_from requires a uri", index))
        })?;
        builder.replace_from_with(uri);
      }
      action => {
        let match_by = self
          .match_by
          .as_ref()
          .ok_or_else(|| AdviceError::Plan(format!("step {}: {:?} requires a match", index, action)))?
          .to_match_by()?;
        let weave = builder
          .weave_by(match_by)
          .with_selection(self.select.to_selection()?);
        match action {
          PlanAction::Remove => weave.remove(),
          PlanAction::Replace => {
            self.require_outputs(index)?;
            fill(weave.replace(), &self.outputs);
          }
          PlanAction::Before => {
            self.require_outputs(index)?;
            fill(weave.before(), &self.outputs);
          }
          _ => {
            self.require_outputs(index)?;
            fill(weave.after(), &self.outputs);
          }
        }
      }
    }
    Ok(())
  }
}

/// A route lookup plus ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvicePlan {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub route_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub route_index: Option<usize>,
  #[serde(default)]
  pub steps: Vec<PlanStep>,
}

impl AdvicePlan {
  pub fn from_json(json: &str) -> Result<Self> {
    serde_json::from_str(json).map_err(|e| AdviceError::Plan(e.to_string()))
  }

  pub fn lookup(&self) -> Result<RouteLookup> {
    match (&self.route_id, self.route_index) {
      (Some(_), Some(_)) => Err(AdviceError::Plan(
        "route_id and route_index cannot be combined".to_string(),
      )),
      (Some(id), None) => Ok(RouteLookup::Id(id.clone())),
      (None, Some(index)) => Ok(RouteLookup::Index(index)),
      (None, None) => Ok(RouteLookup::First),
    }
  }

  /// Records every step on `builder`, in order.
  pub fn configure(&self, builder: &mut AdviceWithBuilder) -> Result<()> {
    for (index, step) in self.steps.iter().enumerate() {
      step.configure(index, builder)?;
    }
    Ok(())
  }

  /// Advises the plan's route in `registry`.
  pub fn apply<R: RouteRegistry + ?Sized>(&self, registry: &mut R) -> Result<RouteDefinition> {
    advice_with(registry, self.lookup()?, |builder| self.configure(builder))
  }
}

/// Reads an [AdvicePlan] from a JSON file.
pub fn load_plan(path: &Path) -> Result<AdvicePlan> {
  let json = std::fs::read_to_string(path)
    .map_err(|e| AdviceError::Plan(format!("cannot read {}: {}", path.display(), e)))?;
  AdvicePlan::from_json(&json)
}

/// Reads a JSON array of routes.
pub fn load_routes(path: &Path) -> Result<Vec<RouteSpec>> {
  let json = std::fs::read_to_string(path)
    .map_err(|e| AdviceError::InvalidRoute(format!("cannot read {}: {}", path.display(), e)))?;
  serde_json::from_str(&json)
    .map_err(|e| AdviceError::InvalidRoute(format!("{}: {}", path.display(), e)))
}
