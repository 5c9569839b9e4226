//! Fluent builder DSL producing declarative routes and processor trees.
//!
//! Block constructs (`filter`, `choice`/`when`/`otherwise`, `split`, ...) open a frame that
//! collects the following steps until `end()`. Frames still open at `build()` are closed
//! implicitly. Misuse is recorded and reported by `build()` as [AdviceError::Dsl].

use crate::error::{AdviceError, Result};
use crate::types::{Expression, NodeKind, ProcessorDefinition, RouteSpec};

/// Accumulates a list of processor definitions, tracking open blocks.
#[derive(Debug, Default, Clone)]
pub struct OutputsBuilder {
  root: Vec<ProcessorDefinition>,
  stack: Vec<ProcessorDefinition>,
  error: Option<String>,
}

impl OutputsBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// True if nothing was added.
  pub fn is_empty(&self) -> bool {
    self.root.is_empty() && self.stack.is_empty()
  }

  fn current(&mut self) -> &mut Vec<ProcessorDefinition> {
    match self.stack.last_mut() {
      Some(block) => &mut block.outputs,
      None => &mut self.root,
    }
  }

  fn top_kind(&self) -> Option<NodeKind> {
    self.stack.last().map(|b| b.kind)
  }

  fn fail(&mut self, message: impl Into<String>) {
    if self.error.is_none() {
      self.error = Some(message.into());
    }
  }

  /// Appends `node` to the innermost open block (or the top level).
  pub(crate) fn push_node(&mut self, node: ProcessorDefinition) {
    if self.top_kind() == Some(NodeKind::Choice) {
      self.fail(format!(
        "a choice() must continue with when() or otherwise(), not {}",
        node.kind
      ));
      return;
    }
    self.current().push(node);
  }

  /// Appends `block` and makes it the innermost open block.
  pub(crate) fn open(&mut self, block: ProcessorDefinition) {
    if self.top_kind() == Some(NodeKind::Choice) && !block.kind.is_branch() {
      self.fail(format!(
        "a choice() must continue with when() or otherwise(), not {}",
        block.kind
      ));
      return;
    }
    self.stack.push(block);
  }

  /// Closes the innermost open block into its parent.
  fn close(&mut self) {
    if let Some(block) = self.stack.pop() {
      self.current().push(block);
    }
  }

  /// Closes an open `when`/`otherwise` so the enclosing choice is on top again.
  fn close_branch(&mut self) {
    if self.top_kind().is_some_and(NodeKind::is_branch) {
      self.close();
    }
  }

  pub(crate) fn branch(&mut self, branch: ProcessorDefinition) {
    if self.top_kind() == Some(NodeKind::Otherwise) {
      self.fail(format!("{}() cannot follow otherwise()", branch.kind));
      return;
    }
    self.close_branch();
    if self.top_kind() != Some(NodeKind::Choice) {
      self.fail(format!("{}() must be used inside a choice()", branch.kind));
      return;
    }
    self.open(branch);
  }

  pub(crate) fn end_block(&mut self) {
    match self.top_kind() {
      None => self.fail("end() called without an open block"),
      Some(kind) if kind.is_branch() => {
        self.close();
        self.close();
      }
      Some(_) => self.close(),
    }
  }

  pub(crate) fn end_branch(&mut self) {
    match self.top_kind() {
      Some(kind) if kind.is_branch() => self.close(),
      Some(NodeKind::Choice) => {}
      _ => self.fail("endChoice() must be used inside a choice()"),
    }
  }

  /// Sets the id of the last added node, or of the innermost block when it has no children yet.
  pub(crate) fn name_last(&mut self, id: String) {
    if let Some(block) = self.stack.last_mut() {
      match block.outputs.last_mut() {
        Some(last) => last.id = Some(id),
        None => block.id = Some(id),
      }
      return;
    }
    if let Some(last) = self.root.last_mut() {
      last.id = Some(id);
      return;
    }
    self.fail(format!("id({}) has no node to name", id));
  }

  /// Closes any open blocks and returns the collected definitions.
  pub fn build(&mut self) -> Result<Vec<ProcessorDefinition>> {
    if let Some(message) = self.error.take() {
      return Err(AdviceError::Dsl(message));
    }
    while !self.stack.is_empty() {
      self.close();
    }
    Ok(std::mem::take(&mut self.root))
  }
}

/// Steps shared by every builder that collects processor definitions.
pub trait ProcessorDsl {
  fn outputs_builder(&mut self) -> &mut OutputsBuilder;

  /// Appends an already built definition.
  fn add(&mut self, node: ProcessorDefinition) -> &mut Self {
    self.outputs_builder().push_node(node);
    self
  }

  fn to(&mut self, uri: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::to(uri))
  }

  fn to_d(&mut self, uri: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::ToDynamic).with_uri(uri))
  }

  fn wire_tap(&mut self, uri: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::WireTap).with_uri(uri))
  }

  fn log(&mut self, message: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::log(message))
  }

  fn set_body(&mut self, expression: Expression) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::SetBody).with_expression(expression))
  }

  fn set_header(&mut self, name: impl Into<String>, expression: Expression) -> &mut Self {
    self.add(
      ProcessorDefinition::new(NodeKind::SetHeader)
        .with_reference(name)
        .with_expression(expression),
    )
  }

  fn transform(&mut self, expression: Expression) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::Transform).with_expression(expression))
  }

  fn process(&mut self, reference: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::Process).with_reference(reference))
  }

  fn bean(&mut self, reference: impl Into<String>) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::Bean).with_reference(reference))
  }

  fn delay(&mut self, expression: Expression) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::Delay).with_expression(expression))
  }

  fn stop(&mut self) -> &mut Self {
    self.add(ProcessorDefinition::new(NodeKind::Stop))
  }

  fn filter(&mut self, expression: Expression) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::Filter).with_expression(expression));
    self
  }

  fn choice(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::Choice));
    self
  }

  fn when(&mut self, expression: Expression) -> &mut Self {
    self
      .outputs_builder()
      .branch(ProcessorDefinition::new(NodeKind::When).with_expression(expression));
    self
  }

  fn otherwise(&mut self) -> &mut Self {
    self
      .outputs_builder()
      .branch(ProcessorDefinition::new(NodeKind::Otherwise));
    self
  }

  /// Closes the current `when`/`otherwise`, staying inside the choice.
  fn end_choice(&mut self) -> &mut Self {
    self.outputs_builder().end_branch();
    self
  }

  fn split(&mut self, expression: Expression) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::Split).with_expression(expression));
    self
  }

  fn multicast(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::Multicast));
    self
  }

  fn pipeline(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::Pipeline));
    self
  }

  fn loop_times(&mut self, expression: Expression) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::Loop).with_expression(expression));
    self
  }

  /// Wraps the rest of the route in a transaction boundary.
  fn transacted(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::Transacted));
    self
  }

  fn policy(&mut self, reference: impl Into<String>) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::Policy).with_reference(reference));
    self
  }

  fn on_exception(&mut self, exceptions: &[&str]) -> &mut Self {
    self.outputs_builder().open(
      ProcessorDefinition::new(NodeKind::OnException).with_reference(exceptions.join(", ")),
    );
    self
  }

  fn on_completion(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::OnCompletion));
    self
  }

  fn intercept(&mut self) -> &mut Self {
    self.outputs_builder().open(ProcessorDefinition::new(NodeKind::Intercept));
    self
  }

  fn intercept_from(&mut self, uri: impl Into<String>) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::InterceptFrom).with_uri(uri));
    self
  }

  fn intercept_send_to_endpoint(&mut self, uri: impl Into<String>) -> &mut Self {
    self
      .outputs_builder()
      .open(ProcessorDefinition::new(NodeKind::InterceptSendToEndpoint).with_uri(uri));
    self
  }

  /// Assigns a custom id to the last added node.
  fn id(&mut self, id: impl Into<String>) -> &mut Self {
    self.outputs_builder().name_last(id.into());
    self
  }

  /// Closes the innermost block; inside a choice branch this closes the whole choice.
  fn end(&mut self) -> &mut Self {
    self.outputs_builder().end_block();
    self
  }
}

impl ProcessorDsl for OutputsBuilder {
  fn outputs_builder(&mut self) -> &mut OutputsBuilder {
    self
  }
}

/// Builds a [RouteSpec] starting from an input endpoint.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
  spec: RouteSpec,
  outputs: OutputsBuilder,
}

impl RouteBuilder {
  pub fn from(uri: impl Into<String>) -> Self {
    Self {
      spec: RouteSpec::new(uri),
      outputs: OutputsBuilder::new(),
    }
  }

  pub fn route_id(&mut self, id: impl Into<String>) -> &mut Self {
    self.spec.route_id = Some(id.into());
    self
  }

  pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
    self.spec.description = Some(description.into());
    self
  }

  pub fn error_handler(&mut self, reference: impl Into<String>) -> &mut Self {
    self.spec.error_handler = Some(reference.into());
    self
  }

  pub fn input_uri(&self) -> &str {
    &self.spec.from
  }

  pub fn build(&mut self) -> Result<RouteSpec> {
    let mut spec = self.spec.clone();
    spec.outputs = self.outputs.build()?;
    Ok(spec)
  }
}

impl ProcessorDsl for RouteBuilder {
  fn outputs_builder(&mut self) -> &mut OutputsBuilder {
    &mut self.outputs
  }
}
