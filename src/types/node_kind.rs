//! Processor categories of route nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The concrete kind of a processor node (its type tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
  Pipeline,
  To,
  ToDynamic,
  WireTap,
  Log,
  SetBody,
  SetHeader,
  Transform,
  Process,
  Bean,
  Filter,
  Choice,
  When,
  Otherwise,
  Split,
  Multicast,
  Loop,
  Delay,
  Stop,
  Transacted,
  Policy,
  OnException,
  OnCompletion,
  Intercept,
  InterceptFrom,
  InterceptSendToEndpoint,
}

impl NodeKind {
  /// Cross-cutting or wrapping constructs that sit outside the linear flow.
  pub fn is_abstract(self) -> bool {
    self.is_cross_cutting() || self.wraps_entire_output()
  }

  /// Constructs that are logically siblings of the whole route body.
  pub fn is_cross_cutting(self) -> bool {
    matches!(
      self,
      NodeKind::OnException
        | NodeKind::OnCompletion
        | NodeKind::Intercept
        | NodeKind::InterceptFrom
        | NodeKind::InterceptSendToEndpoint
    )
  }

  /// Nodes that may only be declared directly on the route.
  pub fn is_top_level_only(self) -> bool {
    self.is_cross_cutting()
  }

  /// Transaction and policy boundaries wrap the rest of the route body.
  pub fn wraps_entire_output(self) -> bool {
    matches!(self, NodeKind::Transacted | NodeKind::Policy)
  }

  /// Nodes that send to a literal or dynamic endpoint uri.
  pub fn sends_to_endpoint(self) -> bool {
    matches!(self, NodeKind::To | NodeKind::ToDynamic | NodeKind::WireTap)
  }

  /// Nodes configured with an expression.
  pub fn has_expression(self) -> bool {
    matches!(
      self,
      NodeKind::Log
        | NodeKind::SetBody
        | NodeKind::SetHeader
        | NodeKind::Transform
        | NodeKind::Filter
        | NodeKind::When
        | NodeKind::Split
        | NodeKind::Loop
        | NodeKind::Delay
    )
  }

  /// Block constructs that own child outputs.
  pub fn is_block(self) -> bool {
    matches!(
      self,
      NodeKind::Pipeline
        | NodeKind::Filter
        | NodeKind::Choice
        | NodeKind::When
        | NodeKind::Otherwise
        | NodeKind::Split
        | NodeKind::Multicast
        | NodeKind::Loop
        | NodeKind::Transacted
        | NodeKind::Policy
        | NodeKind::OnException
        | NodeKind::OnCompletion
        | NodeKind::Intercept
        | NodeKind::InterceptFrom
        | NodeKind::InterceptSendToEndpoint
    )
  }

  /// Branch containers of a `choice`.
  pub fn is_branch(self) -> bool {
    matches!(self, NodeKind::When | NodeKind::Otherwise)
  }

  /// Short name used for rendering and synthesized ids (e.g. `to`, `choice`).
  pub fn short_name(self) -> &'static str {
    match self {
      NodeKind::Pipeline => "pipeline",
      NodeKind::To => "to",
      NodeKind::ToDynamic => "toD",
      NodeKind::WireTap => "wireTap",
      NodeKind::Log => "log",
      NodeKind::SetBody => "setBody",
      NodeKind::SetHeader => "setHeader",
      NodeKind::Transform => "transform",
      NodeKind::Process => "process",
      NodeKind::Bean => "bean",
      NodeKind::Filter => "filter",
      NodeKind::Choice => "choice",
      NodeKind::When => "when",
      NodeKind::Otherwise => "otherwise",
      NodeKind::Split => "split",
      NodeKind::Multicast => "multicast",
      NodeKind::Loop => "loop",
      NodeKind::Delay => "delay",
      NodeKind::Stop => "stop",
      NodeKind::Transacted => "transacted",
      NodeKind::Policy => "policy",
      NodeKind::OnException => "onException",
      NodeKind::OnCompletion => "onCompletion",
      NodeKind::Intercept => "intercept",
      NodeKind::InterceptFrom => "interceptFrom",
      NodeKind::InterceptSendToEndpoint => "interceptSendToEndpoint",
    }
  }

  /// Display name used in string renderings (e.g. `To`, `OnException`).
  pub fn display_name(self) -> &'static str {
    match self {
      NodeKind::Pipeline => "Pipeline",
      NodeKind::To => "To",
      NodeKind::ToDynamic => "ToD",
      NodeKind::WireTap => "WireTap",
      NodeKind::Log => "Log",
      NodeKind::SetBody => "SetBody",
      NodeKind::SetHeader => "SetHeader",
      NodeKind::Transform => "Transform",
      NodeKind::Process => "Process",
      NodeKind::Bean => "Bean",
      NodeKind::Filter => "Filter",
      NodeKind::Choice => "Choice",
      NodeKind::When => "When",
      NodeKind::Otherwise => "Otherwise",
      NodeKind::Split => "Split",
      NodeKind::Multicast => "Multicast",
      NodeKind::Loop => "Loop",
      NodeKind::Delay => "Delay",
      NodeKind::Stop => "Stop",
      NodeKind::Transacted => "Transacted",
      NodeKind::Policy => "Policy",
      NodeKind::OnException => "OnException",
      NodeKind::OnCompletion => "OnCompletion",
      NodeKind::Intercept => "Intercept",
      NodeKind::InterceptFrom => "InterceptFrom",
      NodeKind::InterceptSendToEndpoint => "InterceptSendToEndpoint",
    }
  }

  /// True if this kind is `ty` or one of its subtypes.
  pub fn is_a(self, ty: NodeType) -> bool {
    match ty {
      NodeType::Any => true,
      NodeType::Send => self.sends_to_endpoint(),
      NodeType::Expression => self.has_expression(),
      NodeType::Output => self.is_block(),
      NodeType::Intercept => matches!(self, NodeKind::Intercept | NodeKind::InterceptFrom),
      NodeType::Kind(kind) => self == kind,
    }
  }
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.short_name())
  }
}

/// A processor category tested by by-type matching: a concrete kind or a family of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
  /// Every processor node.
  Any,
  /// Endpoint-sending nodes (`to`, `toD`, `wireTap`).
  Send,
  /// Nodes configured with an expression.
  Expression,
  /// Block constructs owning outputs.
  Output,
  /// `intercept` and its `interceptFrom` subtype.
  Intercept,
  /// Exactly this kind.
  Kind(NodeKind),
}

impl From<NodeKind> for NodeType {
  fn from(kind: NodeKind) -> Self {
    NodeType::Kind(kind)
  }
}

impl fmt::Display for NodeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeType::Any => write!(f, "ProcessorDefinition"),
      NodeType::Send => write!(f, "SendDefinition"),
      NodeType::Expression => write!(f, "ExpressionNode"),
      NodeType::Output => write!(f, "OutputDefinition"),
      NodeType::Intercept => write!(f, "InterceptDefinition"),
      NodeType::Kind(kind) => write!(f, "{}Definition", kind.display_name()),
    }
  }
}
