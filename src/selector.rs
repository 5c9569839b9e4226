//! Narrowing a matched node sequence down to the nodes a weave task edits.

use serde::{Deserialize, Serialize};

use crate::types::NodeId;

/// Selection rules attached to one weave task.
///
/// `first` and `last` take precedence over an index range. `max_deep` bounds the traversal
/// depth; depth 1 is the route's top-level outputs and `None` or `0` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
  #[serde(default)]
  pub first: bool,
  #[serde(default)]
  pub last: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub from: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_deep: Option<usize>,
}

impl Selection {
  /// Every match, unbounded depth.
  pub fn all() -> Self {
    Self::default()
  }

  pub fn first() -> Self {
    Self {
      first: true,
      ..Self::default()
    }
  }

  pub fn last() -> Self {
    Self {
      last: true,
      ..Self::default()
    }
  }

  pub fn index(index: usize) -> Self {
    Self::range(index, index)
  }

  /// Inclusive range `from..=to` over the match sequence.
  pub fn range(from: usize, to: usize) -> Self {
    Self {
      from: Some(from),
      to: Some(to),
      ..Self::default()
    }
  }

  pub fn with_max_deep(mut self, max_deep: usize) -> Self {
    self.max_deep = Some(max_deep);
    self
  }

  /// True if `first` or `last` is requested.
  pub fn is_first_or_last(&self) -> bool {
    self.first || self.last
  }

  /// True if `depth` (1-based) is within the traversal bound.
  pub fn within_depth(&self, depth: usize) -> bool {
    match self.max_deep {
      None | Some(0) => true,
      Some(max) => depth <= max,
    }
  }
}

/// Yields the subset of `matches` picked by `selection`, in traversal order.
///
/// A range with either bound at or past the end of `matches` yields nothing, as does an
/// inverted range.
pub fn select(matches: Vec<NodeId>, selection: &Selection) -> std::vec::IntoIter<NodeId> {
  let picked = if selection.first {
    matches.into_iter().take(1).collect()
  } else if selection.last {
    matches.last().copied().into_iter().collect()
  } else if let (Some(from), Some(to)) = (selection.from, selection.to) {
    if from >= matches.len() || to >= matches.len() || from > to {
      Vec::new()
    } else {
      matches[from..=to].to_vec()
    }
  } else {
    matches
  };
  picked.into_iter()
}
