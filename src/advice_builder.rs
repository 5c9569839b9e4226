//! Configuration surface of an advice call: collects edit tasks and checks what the caller
//! tried to declare besides them.
//!
//! Each `weave_*` call returns a [WeaveBuilder]; its selection methods narrow the match and the
//! terminal methods (`replace`, `before`, `after`, `remove`) record a task. The first three hand
//! back an [OutputsBuilder] collecting the nodes to splice.

use std::fmt;

use tracing::info;

use crate::error::{AdviceError, Result};
use crate::match_by::MatchBy;
use crate::route_builder::{OutputsBuilder, RouteBuilder};
use crate::selector::Selection;
use crate::types::{NodeType, ProcessorDefinition, RouteDefinition};
use crate::weave::{WeaveAction, weave};

/// One recorded edit, executed against the detached route in recording order.
#[derive(Debug, Clone)]
pub enum AdviceTask {
  Weave {
    match_by: MatchBy,
    selection: Selection,
    action: WeaveAction,
    outputs: Vec<ProcessorDefinition>,
  },
  ReplaceFrom {
    uri: String,
  },
}

impl AdviceTask {
  pub fn execute(&self, route: &mut RouteDefinition) -> Result<()> {
    match self {
      AdviceTask::Weave {
        match_by,
        selection,
        action,
        outputs,
      } => weave(route, match_by, selection, *action, outputs).map(|_| ()),
      AdviceTask::ReplaceFrom { uri } => {
        info!(from = %route.input().uri, to = %uri, "advice route input");
        route.set_input_uri(uri.clone());
        Ok(())
      }
    }
  }
}

impl fmt::Display for AdviceTask {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AdviceTask::Weave {
        match_by, action, ..
      } => write!(f, "{} {}", action.name(), match_by),
      AdviceTask::ReplaceFrom { uri } => write!(f, "replaceFrom {}", uri),
    }
  }
}

#[derive(Debug, Clone)]
enum PendingKind {
  Weave {
    match_by: MatchBy,
    selection: Selection,
    action: WeaveAction,
  },
  ReplaceFrom {
    uri: String,
  },
}

#[derive(Debug, Clone)]
struct PendingTask {
  kind: PendingKind,
  replacement: OutputsBuilder,
}

/// Handed to the configurer of an advice call.
#[derive(Debug, Default)]
pub struct AdviceWithBuilder {
  tasks: Vec<PendingTask>,
  new_routes: Vec<RouteBuilder>,
  error_handler: Option<String>,
}

impl AdviceWithBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn weave_by(&mut self, match_by: MatchBy) -> WeaveBuilder<'_> {
    WeaveBuilder {
      advice: self,
      match_by,
      selection: Selection::default(),
    }
  }

  pub fn weave_by_id(&mut self, pattern: impl Into<String>) -> WeaveBuilder<'_> {
    self.weave_by(MatchBy::by_id(pattern))
  }

  pub fn weave_by_to_string(&mut self, pattern: impl Into<String>) -> WeaveBuilder<'_> {
    self.weave_by(MatchBy::by_to_string(pattern))
  }

  pub fn weave_by_to_uri(&mut self, pattern: impl Into<String>) -> WeaveBuilder<'_> {
    self.weave_by(MatchBy::by_to_uri(pattern))
  }

  pub fn weave_by_type(&mut self, ty: impl Into<NodeType>) -> WeaveBuilder<'_> {
    self.weave_by(MatchBy::by_type(ty))
  }

  /// Inserts before the first functional top-level node.
  pub fn weave_add_first(&mut self) -> &mut OutputsBuilder {
    self
      .weave_by_id("*")
      .select_first()
      .max_deep(1)
      .before()
  }

  /// Inserts after the last top-level node.
  pub fn weave_add_last(&mut self) -> &mut OutputsBuilder {
    self.weave_by_id("*").select_last().max_deep(1).after()
  }

  /// Replaces the route's input endpoint.
  pub fn replace_from_with(&mut self, uri: impl Into<String>) {
    self.tasks.push(PendingTask {
      kind: PendingKind::ReplaceFrom { uri: uri.into() },
      replacement: OutputsBuilder::new(),
    });
  }

  /// Declares a new route. Advice cannot add routes, so the call is rejected later.
  pub fn from(&mut self, uri: impl Into<String>) -> &mut RouteBuilder {
    let index = self.new_routes.len();
    self.new_routes.push(RouteBuilder::from(uri));
    &mut self.new_routes[index]
  }

  /// Declares an error handler; only the context default is accepted.
  pub fn error_handler(&mut self, reference: impl Into<String>) {
    self.error_handler = Some(reference.into());
  }

  pub fn new_route_count(&self) -> usize {
    self.new_routes.len()
  }

  pub fn declared_error_handler(&self) -> Option<&str> {
    self.error_handler.as_deref()
  }

  pub fn task_count(&self) -> usize {
    self.tasks.len()
  }

  fn record(&mut self, kind: PendingKind) -> &mut OutputsBuilder {
    let index = self.tasks.len();
    self.tasks.push(PendingTask {
      kind,
      replacement: OutputsBuilder::new(),
    });
    &mut self.tasks[index].replacement
  }

  /// Finishes every replacement builder and returns the tasks in recording order.
  ///
  /// A `before`/`after` with no steps is a [AdviceError::Dsl] error.
  pub fn build_tasks(&mut self) -> Result<Vec<AdviceTask>> {
    std::mem::take(&mut self.tasks)
      .into_iter()
      .map(|mut pending| -> Result<AdviceTask> {
        Ok(match pending.kind {
          PendingKind::Weave {
            match_by,
            selection,
            action,
          } => {
            let outputs = pending.replacement.build()?;
            if outputs.is_empty() && matches!(action, WeaveAction::Before | WeaveAction::After) {
              return Err(AdviceError::Dsl(format!(
                "{} {} has no steps to insert",
                action.name(),
                match_by
              )));
            }
            AdviceTask::Weave {
              match_by,
              selection,
              action,
              outputs,
            }
          }
          PendingKind::ReplaceFrom { uri } => AdviceTask::ReplaceFrom { uri },
        })
      })
      .collect()
  }
}

/// A pending weave: a match strategy plus selection rules, waiting for its action.
#[derive(Debug)]
pub struct WeaveBuilder<'a> {
  advice: &'a mut AdviceWithBuilder,
  match_by: MatchBy,
  selection: Selection,
}

impl<'a> WeaveBuilder<'a> {
  pub fn select_first(mut self) -> Self {
    self.selection.first = true;
    self
  }

  pub fn select_last(mut self) -> Self {
    self.selection.last = true;
    self
  }

  pub fn select_index(mut self, index: usize) -> Self {
    self.selection.from = Some(index);
    self.selection.to = Some(index);
    self
  }

  pub fn select_range(mut self, from: usize, to: usize) -> Self {
    self.selection.from = Some(from);
    self.selection.to = Some(to);
    self
  }

  /// Limits traversal depth; `1` is the top-level outputs, `0` is unbounded.
  pub fn max_deep(mut self, max_deep: usize) -> Self {
    self.selection.max_deep = Some(max_deep);
    self
  }

  pub fn with_selection(mut self, selection: Selection) -> Self {
    self.selection = selection;
    self
  }

  fn finish(self, action: WeaveAction) -> &'a mut OutputsBuilder {
    let advice = self.advice;
    advice.record(PendingKind::Weave {
      match_by: self.match_by,
      selection: self.selection,
      action,
    })
  }

  pub fn replace(self) -> &'a mut OutputsBuilder {
    self.finish(WeaveAction::Replace)
  }

  pub fn before(self) -> &'a mut OutputsBuilder {
    self.finish(WeaveAction::Before)
  }

  pub fn after(self) -> &'a mut OutputsBuilder {
    self.finish(WeaveAction::After)
  }

  pub fn remove(self) {
    self.finish(WeaveAction::Remove);
  }
}
