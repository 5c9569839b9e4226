//! CLI: apply an advice plan to routes loaded from JSON and print the advised route.
//!
//! Usage: `advise_route --routes <routes.json> --plan <plan.json> [--format xml|json] [--dump]`
//! Example: advise_route --routes tests/integration/routes.json --plan tests/integration/plan_replace.json
//!
//! Set RUST_LOG=routeweave=trace for TRACE-level span enter/exit and events.

use clap::{Parser, ValueEnum};
use routeweave::context::DUMP_ROUTES_ENV;
use routeweave::dump::{dump_route_as_json, dump_route_as_xml};
use routeweave::{AdviceOptions, ModelContext, load_plan, load_routes};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
  Xml,
  Json,
}

/// Apply an advice plan to a route.
#[derive(Parser, Debug)]
#[command(name = "advise_route")]
#[command(
  after_help = r#"Environment variables (override flags when set):
  ROUTEWEAVE_DUMP_ROUTES   1/true to log each route as XML before and after advice.

Examples:
  advise_route --routes routes.json --plan plan.json
  advise_route --routes routes.json --plan plan.json --format json"#
)]
struct Args {
  /// JSON array of routes to register.
  #[arg(long, value_name = "FILE")]
  routes: PathBuf,

  /// JSON advice plan.
  #[arg(long, value_name = "FILE")]
  plan: PathBuf,

  /// Output format of the advised route.
  #[arg(long, value_enum, default_value = "xml")]
  format: Format,

  /// Log routes before and after advice. Overridden by ROUTEWEAVE_DUMP_ROUTES if set.
  #[arg(long)]
  dump: bool,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Env var overrides the flag.
  let options = if env::var_os(DUMP_ROUTES_ENV).is_some() {
    AdviceOptions::from_env()
  } else {
    AdviceOptions {
      dump_routes: args.dump,
      ..AdviceOptions::default()
    }
  };
  info!(routes = %args.routes.display(), plan = %args.plan.display(), dump_routes = options.dump_routes, "advise_route starting");

  let specs = match load_routes(&args.routes) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Error loading routes: {}", e);
      process::exit(1);
    }
  };

  let plan = match load_plan(&args.plan) {
    Ok(p) => p,
    Err(e) => {
      eprintln!("Error loading plan: {}", e);
      process::exit(1);
    }
  };

  let mut context = ModelContext::new().with_options(options);
  if let Err(e) = context.add_routes(specs) {
    eprintln!("Error registering routes: {}", e);
    process::exit(1);
  }

  let route = match plan.apply(&mut context) {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Advice error: {}", e);
      process::exit(1);
    }
  };

  let rendered = match args.format {
    Format::Xml => dump_route_as_xml(&route),
    Format::Json => dump_route_as_json(&route),
  };
  match rendered {
    Ok(text) => println!("{}", text),
    Err(e) => {
      eprintln!("Error rendering route: {}", e);
      process::exit(1);
    }
  }
}
