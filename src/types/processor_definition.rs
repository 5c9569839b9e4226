//! Declarative, owned processor tree as produced by the builder DSL and by plan files.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Expression, NodeKind};

/// One declared step of a route, owning its child outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorDefinition {
  pub kind: NodeKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Destination uri for sending kinds; source uri for `interceptFrom`/`interceptSendToEndpoint`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uri: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expression: Option<Expression>,
  /// Bean/processor/policy reference, header name for `setHeader`, exception names for `onException`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reference: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub outputs: Vec<ProcessorDefinition>,
}

impl ProcessorDefinition {
  pub fn new(kind: NodeKind) -> Self {
    Self {
      kind,
      id: None,
      uri: None,
      expression: None,
      reference: None,
      outputs: Vec::new(),
    }
  }

  /// A `to` step sending to `uri`.
  pub fn to(uri: impl Into<String>) -> Self {
    Self::new(NodeKind::To).with_uri(uri)
  }

  /// A `log` step with a simple message.
  pub fn log(message: impl Into<String>) -> Self {
    Self::new(NodeKind::Log).with_expression(Expression::simple(message))
  }

  /// An ordered pipeline wrapping `outputs`.
  pub fn pipeline(outputs: Vec<ProcessorDefinition>) -> Self {
    Self::new(NodeKind::Pipeline).with_outputs(outputs)
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
    self.uri = Some(uri.into());
    self
  }

  pub fn with_expression(mut self, expression: Expression) -> Self {
    self.expression = Some(expression);
    self
  }

  pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
    self.reference = Some(reference.into());
    self
  }

  pub fn with_outputs(mut self, outputs: Vec<ProcessorDefinition>) -> Self {
    self.outputs = outputs;
    self
  }

  /// Collapses a holder of several nodes into one node to splice: the node itself
  /// when there is exactly one, otherwise a pipeline around all of them.
  pub fn flatten(mut outputs: Vec<ProcessorDefinition>) -> Option<ProcessorDefinition> {
    match outputs.len() {
      0 => None,
      1 => outputs.pop(),
      _ => Some(ProcessorDefinition::pipeline(outputs)),
    }
  }

  /// Label shown inside the brackets of the string rendering.
  fn label(&self) -> Option<String> {
    match self.kind {
      NodeKind::SetHeader => Some(format!(
        "{}, {}",
        self.reference.as_deref().unwrap_or(""),
        self.expression.as_ref().map(|e| e.to_string()).unwrap_or_default()
      )),
      NodeKind::Log => self.expression.as_ref().map(|e| e.text.clone()),
      NodeKind::OnException => self.reference.as_ref().map(|r| format!("[{}]", r)),
      NodeKind::Process | NodeKind::Bean | NodeKind::Policy | NodeKind::Transacted => {
        self.reference.as_ref().map(|r| format!("ref:{}", r))
      }
      _ => self
        .uri
        .clone()
        .or_else(|| self.expression.as_ref().map(|e| e.to_string())),
    }
  }
}

/// Writes `[a, b, c]` using each element's rendering.
fn write_list(f: &mut fmt::Formatter<'_>, items: &[ProcessorDefinition]) -> fmt::Result {
  f.write_str("[")?;
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      f.write_str(", ")?;
    }
    write!(f, "{}", item)?;
  }
  f.write_str("]")
}

impl fmt::Display for ProcessorDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = self.kind.display_name();
    if self.kind == NodeKind::Choice {
      let (whens, rest): (Vec<_>, Vec<_>) = self
        .outputs
        .iter()
        .cloned()
        .partition(|o| o.kind == NodeKind::When);
      write!(f, "{}[", name)?;
      write_list(f, &whens)?;
      for other in &rest {
        write!(f, " {}", other)?;
      }
      return f.write_str("]");
    }
    match (self.label(), self.kind.is_block()) {
      (Some(label), true) => {
        write!(f, "{}[{} -> ", name, label)?;
        write_list(f, &self.outputs)?;
        f.write_str("]")
      }
      (None, true) => {
        write!(f, "{}[", name)?;
        write_list(f, &self.outputs)?;
        f.write_str("]")
      }
      (Some(label), false) => write!(f, "{}[{}]", name, label),
      (None, false) => f.write_str(name),
    }
  }
}
