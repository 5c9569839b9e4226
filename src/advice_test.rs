//! Tests for `advice`.

use crate::advice::{RouteLookup, advice_with};
use crate::context::{AdviceOptions, ModelContext, RouteRegistry, RouteStatus};
use crate::error::AdviceError;
use crate::route_builder::{ProcessorDsl, RouteBuilder};
use crate::types::{Expression, NodeKind, NodeType, Parent, RouteDefinition};

fn abc_context() -> ModelContext {
  let mut ctx = ModelContext::new();
  let spec = RouteBuilder::from("direct:start")
    .route_id("r1")
    .to("mock:A")
    .id("a1")
    .to("mock:B")
    .id("b1")
    .to("mock:C")
    .id("c1")
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  ctx
}

fn top_ids(route: &RouteDefinition) -> Vec<String> {
  route
    .shape_of(Parent::Route)
    .into_iter()
    .map(|(kind, id)| id.unwrap_or_else(|| kind.to_string()))
    .collect()
}

#[test]
fn replace_splices_and_parents_to_route() {
  let mut ctx = abc_context();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("b1").replace().to("mock:D").id("d1");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["a1", "d1", "c1"]);
  let d = route.outputs()[1];
  assert_eq!(route.parent_of(d), Some(Parent::Route));
  assert!(route.is_prepared());

  let registered = ctx.find_route_by_id("r1").unwrap();
  assert_eq!(top_ids(registered), vec!["a1", "d1", "c1"]);
}

#[test]
fn after_inserts_behind_match() {
  let mut ctx = abc_context();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("b1").after().to("mock:E").id("e1");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["a1", "b1", "e1", "c1"]);
}

#[test]
fn weave_add_last_appends() {
  let mut ctx = abc_context();
  let route = advice_with(&mut ctx, RouteLookup::First, |a| {
    a.weave_add_last().to("mock:F").id("f1");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["a1", "b1", "c1", "f1"]);
}

#[test]
fn weave_add_first_skips_cross_cutting_prefix() {
  let mut ctx = ModelContext::new();
  let spec = RouteBuilder::from("direct:start")
    .route_id("r1")
    .on_exception(&["java.io.IOException"])
    .id("oe")
    .to("mock:error")
    .end()
    .to("mock:A")
    .id("a1")
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_add_first().log("first").id("l1");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["oe", "l1", "a1"]);
}

#[test]
fn multiple_tasks_run_in_order() {
  let mut ctx = abc_context();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("a1").remove();
    a.weave_by_id("c1").before().to("mock:X").id("x1").to("mock:Y").id("y1");
    a.replace_from_with("seda:in");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["b1", "pipeline", "c1"]);
  assert_eq!(route.input().uri, "seda:in");
  let pipeline = route.outputs()[1];
  assert_eq!(route.node(pipeline).kind, NodeKind::Pipeline);
  assert_eq!(route.children(pipeline).len(), 2);
}

#[test]
fn choice_branch_is_edited_in_place() {
  let mut ctx = ModelContext::new();
  let spec = RouteBuilder::from("direct:start")
    .route_id("r1")
    .choice()
    .when(Expression::simple("${header.x} == 1"))
    .to("mock:B")
    .id("b1")
    .otherwise()
    .to("mock:C")
    .id("c1")
    .end()
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_to_uri("mock:B").before().to("mock:D").id("d1");
    Ok(())
  })
  .unwrap();
  let choice = route.outputs()[0];
  assert_eq!(route.outputs().len(), 1);
  let when = route.children(choice)[0];
  let ids: Vec<_> = route
    .shape_of(Parent::Node(when))
    .into_iter()
    .filter_map(|(_, id)| id)
    .collect();
  assert_eq!(ids, vec!["d1", "b1"]);
}

#[test]
fn select_first_by_type_targets_first_step() {
  let mut ctx = ModelContext::new();
  let spec = RouteBuilder::from("direct:start")
    .route_id("r1")
    .on_exception(&["java.lang.Exception"])
    .id("oe")
    .end()
    .on_completion()
    .id("oc")
    .end()
    .to("mock:A")
    .id("stepA")
    .to("mock:B")
    .id("stepB")
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  let route = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_type(NodeType::Any).select_first().replace().to("mock:Z").id("z1");
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["oe", "oc", "z1", "stepB"]);
}

#[test]
fn depth_bound_hides_nested_match() {
  let mut ctx = ModelContext::new();
  let spec = RouteBuilder::from("direct:start")
    .route_id("r1")
    .filter(Expression::simple("${body}"))
    .split(Expression::simple("${body}"))
    .log("deep")
    .end()
    .end()
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_type(NodeKind::Split).max_deep(1).remove();
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::NoMatch { .. }));
}

#[test]
fn no_match_names_pattern_and_route() {
  let mut ctx = abc_context();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("zzz").remove();
    Ok(())
  })
  .unwrap_err();
  assert_eq!(
    err.to_string(),
    "there are no outputs which matches: id: zzz in the route: r1[direct:start]"
  );
}

#[test]
fn out_of_bounds_selection_is_no_match() {
  let mut ctx = abc_context();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_to_uri("mock:*").select_range(2, 5).remove();
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::NoMatch { .. }));
}

#[test]
fn lookups_fail_cleanly() {
  let mut empty = ModelContext::new();
  let err = advice_with(&mut empty, RouteLookup::First, |_| Ok(())).unwrap_err();
  assert_eq!(err, AdviceError::NoRoutes);

  let mut ctx = abc_context();
  assert_eq!(
    advice_with(&mut ctx, "missing", |_| Ok(())).unwrap_err(),
    AdviceError::RouteNotFound("missing".to_string())
  );
  assert_eq!(
    advice_with(&mut ctx, 3usize, |_| Ok(())).unwrap_err(),
    AdviceError::RouteIndexOutOfBounds { index: 3, size: 1 }
  );
  // a failed lookup leaves the registry untouched
  assert_eq!(ctx.route_definitions().len(), 1);
}

#[test]
fn new_routes_and_foreign_error_handlers_are_rejected() {
  let mut ctx = abc_context();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.from("direct:other").to("mock:x");
    Ok(())
  })
  .unwrap_err();
  assert_eq!(err, AdviceError::NewRoutesNotSupported(1));

  let err = advice_with(&mut ctx, "r1", |a| {
    a.error_handler("deadLetter");
    Ok(())
  })
  .unwrap_err();
  assert_eq!(err, AdviceError::ErrorHandlerNotSupported("deadLetter".to_string()));
  assert!(ctx.find_route_by_id("r1").is_some());
}

#[test]
fn matching_default_error_handler_is_accepted() {
  let mut ctx = abc_context().with_default_error_handler("deadLetter");
  advice_with(&mut ctx, "r1", |a| {
    a.error_handler("deadLetter");
    a.weave_add_last().stop();
    Ok(())
  })
  .unwrap();
}

#[test]
fn builder_misuse_surfaces_as_dsl_error() {
  let mut ctx = abc_context();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("b1").replace().when(Expression::simple("${body}"));
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::Dsl(_)));
}

#[test]
fn advised_route_moves_to_front_and_starts_when_running() {
  let mut ctx = abc_context();
  let spec = RouteBuilder::from("direct:second")
    .route_id("r2")
    .to("mock:second")
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  ctx.start().unwrap();

  advice_with(&mut ctx, 1usize, |a| {
    a.weave_add_last().log("tail");
    Ok(())
  })
  .unwrap();
  let ids: Vec<_> = ctx
    .route_definitions()
    .iter()
    .filter_map(|r| r.route_id())
    .collect();
  assert_eq!(ids, vec!["r2", "r1"]);
  assert_eq!(ctx.route_status("r2"), Some(RouteStatus::Started));
}

#[test]
fn advised_route_stays_stopped_when_disabled() {
  let mut ctx = abc_context().with_options(AdviceOptions {
    dump_routes: true,
    start_advised_routes: false,
  });
  ctx.start().unwrap();
  advice_with(&mut ctx, "r1", |a| {
    a.weave_by_id("a1").remove();
    Ok(())
  })
  .unwrap();
  assert_eq!(ctx.route_status("r1"), Some(RouteStatus::Stopped));
}

#[test]
fn direct_definition_replaces_registered_route() {
  let mut ctx = abc_context();
  let copy = ctx.find_route_by_id("r1").unwrap().clone();
  let route = advice_with(&mut ctx, copy, |a| {
    a.weave_by_id("c1").remove();
    Ok(())
  })
  .unwrap();
  assert_eq!(top_ids(&route), vec!["a1", "b1"]);
  assert_eq!(ctx.route_definitions().len(), 1);
}

#[test]
fn direct_definition_without_id_is_rejected() {
  let mut ctx = abc_context();
  let spec = RouteBuilder::from("direct:anonymous")
    .to("mock:X")
    .id("x1")
    .build()
    .unwrap();
  let err = advice_with(&mut ctx, RouteDefinition::from_spec(spec), |a| {
    a.weave_by_id("x1").remove();
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::RouteNotFound(_)));
  assert_eq!(ctx.route_definitions().len(), 1);
  assert_eq!(ctx.route_definitions()[0].route_id(), Some("r1"));
}

#[test]
fn weave_cannot_introduce_clashing_ids() {
  let mut ctx = abc_context();
  let spec = RouteBuilder::from("direct:second")
    .route_id("r2")
    .to("mock:second")
    .id("taken")
    .build()
    .unwrap();
  ctx.add_route(spec).unwrap();
  let err = advice_with(&mut ctx, "r1", |a| {
    a.weave_add_last().to("mock:dup").id("taken");
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::DuplicateNodeId { .. }));
}
