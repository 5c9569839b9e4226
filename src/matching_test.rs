//! Tests for `matching`.

use crate::match_by::MatchBy;
use crate::matching::{candidates, find_matches, flatten};
use crate::selector::Selection;
use crate::types::{Expression, NodeKind, ProcessorDefinition, RouteDefinition, RouteSpec};

fn to(uri: &str, id: &str) -> ProcessorDefinition {
  ProcessorDefinition::to(uri).with_id(id)
}

fn route(outputs: Vec<ProcessorDefinition>) -> RouteDefinition {
  let mut spec = RouteSpec::new("direct:start");
  spec.outputs = outputs;
  RouteDefinition::from_spec(spec)
}

fn ids(route: &RouteDefinition, nodes: &[crate::types::NodeId]) -> Vec<String> {
  nodes
    .iter()
    .map(|n| route.node(*n).id.clone().unwrap_or_default())
    .collect()
}

#[test]
fn transacted_is_unwrapped_into_candidates() {
  let r = route(vec![
    ProcessorDefinition::new(NodeKind::Transacted)
      .with_id("tx")
      .with_outputs(vec![to("mock:a", "a"), to("mock:b", "b")]),
  ]);
  assert_eq!(ids(&r, &candidates(&r, &Selection::all())), vec!["a", "b"]);
}

#[test]
fn leading_cross_cutting_nodes_skipped_for_first() {
  let r = route(vec![
    ProcessorDefinition::new(NodeKind::OnException)
      .with_id("oe")
      .with_outputs(vec![to("mock:err", "err")]),
    ProcessorDefinition::new(NodeKind::OnCompletion).with_id("oc"),
    to("mock:a", "stepA"),
    to("mock:b", "stepB"),
  ]);
  let first = Selection::first();
  let matches = find_matches(&r, &MatchBy::by_id("*"), &first);
  let picked: Vec<_> = crate::selector::select(matches, &first).collect();
  assert_eq!(ids(&r, &picked), vec!["stepA"]);

  // without first/last the cross-cutting nodes stay candidates
  assert_eq!(candidates(&r, &Selection::all()).len(), 4);
}

#[test]
fn leading_policy_is_skipped_for_first_and_last() {
  let r = route(vec![
    ProcessorDefinition::new(NodeKind::OnException)
      .with_id("oe")
      .with_outputs(vec![to("mock:err", "err")]),
    ProcessorDefinition::new(NodeKind::Policy)
      .with_id("pol")
      .with_reference("secured")
      .with_outputs(vec![to("mock:a", "a1"), to("mock:b", "b1")]),
  ]);
  assert!(candidates(&r, &Selection::first()).is_empty());
  assert!(candidates(&r, &Selection::last()).is_empty());
  assert!(find_matches(&r, &MatchBy::by_id("*"), &Selection::last()).is_empty());
  assert_eq!(ids(&r, &candidates(&r, &Selection::all())), vec!["oe", "pol"]);
}

#[test]
fn flatten_is_pre_order_and_depth_bounded() {
  let r = route(vec![
    ProcessorDefinition::new(NodeKind::Filter)
      .with_id("f")
      .with_expression(Expression::simple("${header.x}"))
      .with_outputs(vec![
        to("mock:a", "a"),
        ProcessorDefinition::new(NodeKind::Split)
          .with_id("s")
          .with_outputs(vec![to("mock:deep", "deep")]),
      ]),
    to("mock:b", "b"),
  ]);
  let all = Selection::all();
  let roots = candidates(&r, &all);
  assert_eq!(ids(&r, &flatten(&r, &roots, &all)), vec!["f", "a", "s", "deep", "b"]);

  let one = Selection::all().with_max_deep(1);
  assert_eq!(ids(&r, &flatten(&r, &roots, &one)), vec!["f", "b"]);

  let two = Selection::all().with_max_deep(2);
  assert_eq!(ids(&r, &flatten(&r, &roots, &two)), vec!["f", "a", "s", "b"]);
}

#[test]
fn depth_bound_excludes_deeper_matches() {
  let r = route(vec![
    ProcessorDefinition::new(NodeKind::Filter)
      .with_expression(Expression::simple("${header.x}"))
      .with_outputs(vec![to("mock:inner", "inner")]),
    to("mock:outer", "outer"),
  ]);
  let by_uri = MatchBy::by_to_uri("mock:*");
  assert_eq!(find_matches(&r, &by_uri, &Selection::all()).len(), 2);
  let shallow = find_matches(&r, &by_uri, &Selection::all().with_max_deep(1));
  assert_eq!(ids(&r, &shallow), vec!["outer"]);
}

#[test]
fn no_match_is_empty() {
  let r = route(vec![to("mock:a", "a")]);
  assert!(find_matches(&r, &MatchBy::by_id("zzz"), &Selection::all()).is_empty());
}
