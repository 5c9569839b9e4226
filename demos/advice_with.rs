//! Declare a route, advise it, and print it before and after.

use routeweave::dump::dump_route_as_xml;
use routeweave::{Expression, ModelContext, ProcessorDsl, RouteBuilder, RouteRegistry, advice_with};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let mut route = RouteBuilder::from("direct:orders");
  route
    .route_id("orders")
    .on_exception(&["java.io.IOException"])
    .to("mock:error")
    .end()
    .to("mock:A")
    .id("a1")
    .choice()
    .when(Expression::simple("${header.level} == 'gold'"))
    .to("mock:gold")
    .id("gold")
    .otherwise()
    .to("mock:other")
    .end()
    .to("mock:B")
    .id("b1");

  let mut context = ModelContext::new();
  context.add_route(route.build()?)?;
  context.start()?;

  let before = &context.route_definitions()[0];
  println!("Before:\n{}\n", dump_route_as_xml(before)?);

  let advised = advice_with(&mut context, "orders", |a| {
    a.replace_from_with("seda:orders");
    a.weave_by_id("b1").replace().to("mock:D");
    a.weave_by_to_uri("mock:gold").after().log("gold order");
    a.weave_add_first().set_header("audited", Expression::constant("true"));
    a.weave_add_last().to("mock:result");
    Ok(())
  })?;

  println!("After:\n{}", dump_route_as_xml(&advised)?);
  Ok(())
}
