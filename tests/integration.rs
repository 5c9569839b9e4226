//! Integration tests that run the advise_route CLI and the library API on the JSON fixtures
//! in tests/integration/.

use std::path::{Path, PathBuf};
use std::process::Command;

use routeweave::{
  AdviceError, MatchBy, ModelContext, NodeKind, Parent, ProcessorDsl, RouteRegistry, RouteStatus,
  advice_with, load_plan, load_routes,
};

fn integration_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("integration")
}

fn fixture(name: &str) -> String {
  integration_dir()
    .join(name)
    .to_str()
    .expect("path")
    .to_string()
}

/// Run the advise_route binary. Returns (stdout, stderr, success).
fn run_advise_route(args: &[&str]) -> (String, String, bool) {
  run_advise_route_with_env(args, &[])
}

/// Like run_advise_route but with extra env vars (e.g. ROUTEWEAVE_DUMP_ROUTES=1).
fn run_advise_route_with_env(args: &[&str], env: &[(&str, &str)]) -> (String, String, bool) {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_advise_route"));
  cmd
    .args(args)
    .current_dir(env!("CARGO_MANIFEST_DIR"))
    .env_remove("ROUTEWEAVE_DUMP_ROUTES");
  for (k, v) in env {
    cmd.env(k, v);
  }
  let out = cmd.output().expect("run advise_route");
  (
    String::from_utf8_lossy(&out.stdout).into_owned(),
    String::from_utf8_lossy(&out.stderr).into_owned(),
    out.status.success(),
  )
}

fn context() -> ModelContext {
  let specs = load_routes(Path::new(&fixture("routes.json"))).expect("load routes");
  let mut ctx = ModelContext::new();
  ctx.add_routes(specs).expect("add routes");
  ctx
}

fn top_ids(ctx: &ModelContext, route_id: &str) -> Vec<String> {
  ctx
    .find_route_by_id(route_id)
    .expect("route")
    .shape_of(Parent::Route)
    .into_iter()
    .filter_map(|(_, id)| id)
    .collect()
}

// ---- CLI tests using tests/integration/*.json ----

#[test]
fn integration_replace_plan_prints_xml() {
  let routes = fixture("routes.json");
  let plan = fixture("plan_replace.json");
  let (stdout, stderr, success) = run_advise_route(&["--routes", &routes, "--plan", &plan]);
  assert!(success, "plan_replace.json should succeed: stderr={}", stderr);
  assert!(stdout.contains("<route id=\"orders\""));
  assert!(stdout.contains("mock:D"));
  assert!(stdout.contains("mock:F"));
  assert!(!stdout.contains("mock:B"));
  let a = stdout.find("mock:A").expect("mock:A");
  let d = stdout.find("mock:D").expect("mock:D");
  let c = stdout.find("mock:C").expect("mock:C");
  let f = stdout.find("mock:F").expect("mock:F");
  assert!(a < d && d < c && c < f, "unexpected order: {}", stdout);
}

#[test]
fn integration_choice_plan_prints_json() {
  let routes = fixture("routes.json");
  let plan = fixture("plan_choice.json");
  let (stdout, stderr, success) =
    run_advise_route(&["--routes", &routes, "--plan", &plan, "--format", "json"]);
  assert!(success, "plan_choice.json should succeed: stderr={}", stderr);
  let value: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
  assert_eq!(value["from"], "seda:routing");
  let when = &value["outputs"][0]["outputs"][0];
  assert_eq!(when["kind"], "when");
  let ids: Vec<&str> = when["outputs"]
    .as_array()
    .expect("when outputs")
    .iter()
    .filter_map(|n| n["id"].as_str())
    .collect();
  assert_eq!(ids, vec!["g1", "audit", "vip"]);
}

#[test]
fn integration_no_match_plan_fails() {
  let routes = fixture("routes.json");
  let plan = fixture("plan_no_match.json");
  let (_stdout, stderr, success) = run_advise_route(&["--routes", &routes, "--plan", &plan]);
  assert!(!success, "plan_no_match.json should fail (exit non-zero)");
  assert!(
    stderr.contains("there are no outputs which matches"),
    "stderr={}",
    stderr
  );
}

#[test]
fn integration_missing_routes_file_fails() {
  let plan = fixture("plan_replace.json");
  let (_stdout, stderr, success) =
    run_advise_route(&["--routes", "/nonexistent/routes.json", "--plan", &plan]);
  assert!(!success);
  assert!(stderr.contains("Error loading routes"), "stderr={}", stderr);
}

#[test]
fn integration_dump_env_logs_route_before_and_after() {
  let routes = fixture("routes.json");
  let plan = fixture("plan_replace.json");
  let (_stdout, stderr, success) = run_advise_route_with_env(
    &["--routes", &routes, "--plan", &plan],
    &[("ROUTEWEAVE_DUMP_ROUTES", "1")],
  );
  assert!(success, "stderr={}", stderr);
  assert!(stderr.contains("before"), "stderr={}", stderr);
  assert!(stderr.contains("after"), "stderr={}", stderr);
}

// ---- Library path: the same fixtures through the public API ----

#[test]
fn integration_lib_plan_file_matches_builder() {
  let mut from_plan = context();
  load_plan(Path::new(&fixture("plan_replace.json")))
    .expect("load plan")
    .apply(&mut from_plan)
    .expect("apply plan");

  let mut from_builder = context();
  advice_with(&mut from_builder, "orders", |a| {
    a.weave_by_id("b1").replace().to("mock:D").id("d1");
    a.weave_add_last().to("mock:F").id("f1");
    Ok(())
  })
  .expect("advice");

  assert_eq!(top_ids(&from_plan, "orders"), top_ids(&from_builder, "orders"));
  assert_eq!(top_ids(&from_plan, "orders"), vec!["oe", "a1", "d1", "c1", "f1"]);
}

#[test]
fn integration_lib_advised_route_moves_to_front_and_restarts() {
  let mut ctx = context();
  ctx.start().expect("start");
  assert_eq!(ctx.route_definitions()[0].route_id(), Some("orders"));

  advice_with(&mut ctx, "routing", |a| {
    a.weave_by_type(NodeKind::Log).remove();
    Ok(())
  })
  .expect("advice");

  assert_eq!(ctx.route_definitions().len(), 2);
  assert_eq!(ctx.route_definitions()[0].route_id(), Some("routing"));
  assert_eq!(ctx.route_status("routing"), Some(RouteStatus::Started));
  assert_eq!(top_ids(&ctx, "routing"), vec!["cbr"]);
}

#[test]
fn integration_lib_add_first_skips_cross_cutting_nodes() {
  let mut ctx = context();
  advice_with(&mut ctx, "orders", |a| {
    a.weave_add_first().to("mock:head").id("head");
    Ok(())
  })
  .expect("advice");
  assert_eq!(top_ids(&ctx, "orders"), vec!["oe", "head", "a1", "b1", "c1"]);
}

#[test]
fn integration_lib_unknown_id_is_no_match() {
  let mut ctx = context();
  let err = advice_with(&mut ctx, "orders", |a| {
    a.weave_by(MatchBy::by_id("missing*")).remove();
    Ok(())
  })
  .unwrap_err();
  assert!(matches!(err, AdviceError::NoMatch { .. }));
  assert!(err.to_string().contains("missing*"));
}
