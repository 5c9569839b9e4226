//! # routeweave
//!
//! Structural editing ("advice") of already-declared integration routes.
//!
//! ## Architecture
//!
//! A route is a tree of processor nodes ([types::RouteDefinition]). An advice call detaches one
//! route from its registry, runs a list of recorded edit tasks against it, and registers the
//! result again:
//!
//! - [match_by]: node predicates (by id, string rendering, endpoint uri, type).
//! - [matching] and [selector]: which nodes a task reaches and which of them it edits.
//! - [weave]: replace / remove / before / after at each selected node.
//! - [advice_builder]: the fluent surface recording tasks; [advice]: the orchestrator.
//! - [context]: the route registry the orchestrator works against.
//! - [plan]: the same edits read from JSON.
//!
//! Set RUST_LOG=routeweave=trace for span enter/exit and per-task events.

pub mod advice;
#[cfg(test)]
mod advice_test;
pub mod advice_builder;
pub mod context;
pub mod dump;
pub mod error;
pub mod match_by;
pub mod matching;
#[cfg(test)]
mod matching_test;
pub mod pattern;
pub mod plan;
pub mod route_builder;
pub mod route_helper;
pub mod selector;
pub mod types;
pub mod weave;

pub use advice::{RouteLookup, advice_with};
pub use advice_builder::{AdviceTask, AdviceWithBuilder, WeaveBuilder};
pub use context::{AdviceOptions, ModelContext, RouteRegistry, RouteStatus};
pub use error::{AdviceError, DumpError, Result};
pub use match_by::MatchBy;
pub use plan::{AdvicePlan, load_plan, load_routes};
pub use route_builder::{OutputsBuilder, ProcessorDsl, RouteBuilder};
pub use selector::Selection;
pub use types::{
  Expression, NodeId, NodeKind, NodeType, Parent, ProcessorDefinition, RouteDefinition, RouteSpec,
};
pub use weave::WeaveAction;
