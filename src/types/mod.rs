//! Route model types.
//!
//! Declarative trees ([RouteSpec], [ProcessorDefinition]) are what builders and plan files
//! produce; [RouteDefinition] is the live, arena-backed tree the advice engine mutates.

mod expression;
mod node_kind;
mod processor_definition;
mod route_definition;
mod route_spec;

pub use expression::Expression;
pub use node_kind::{NodeKind, NodeType};
pub use processor_definition::ProcessorDefinition;
pub use route_definition::{FromDefinition, NodeId, Parent, ProcessorNode, RouteDefinition};
pub use route_spec::RouteSpec;
