//! Diagnostic text renderings of a live route.
//!
//! The XML form follows the usual route DSL layout:
//! `<route id="r1"><from uri="direct:start"/><to id="a1" uri="mock:a"/>...</route>`.

use serde::Serialize;

use crate::error::DumpError;
use crate::types::{NodeId, NodeKind, RouteDefinition};

#[derive(Serialize)]
#[serde(rename = "route")]
struct XmlRoute {
  #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
  id: Option<String>,
  #[serde(rename = "@errorHandlerRef", skip_serializing_if = "Option::is_none")]
  error_handler: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  description: Option<String>,
  from: XmlFrom,
  #[serde(rename = "$value")]
  outputs: Vec<XmlNode>,
}

#[derive(Serialize)]
struct XmlFrom {
  #[serde(rename = "@uri")]
  uri: String,
}

#[derive(Serialize)]
struct XmlElement {
  #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
  id: Option<String>,
  #[serde(rename = "@uri", skip_serializing_if = "Option::is_none")]
  uri: Option<String>,
  #[serde(rename = "@ref", skip_serializing_if = "Option::is_none")]
  reference: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  expression: Option<XmlExpression>,
  #[serde(rename = "$value", skip_serializing_if = "Vec::is_empty")]
  outputs: Vec<XmlNode>,
}

#[derive(Serialize)]
struct XmlExpression {
  #[serde(rename = "@language")]
  language: String,
  #[serde(rename = "$text")]
  text: String,
}

#[derive(Serialize)]
enum XmlNode {
  #[serde(rename = "pipeline")]
  Pipeline(XmlElement),
  #[serde(rename = "to")]
  To(XmlElement),
  #[serde(rename = "toD")]
  ToDynamic(XmlElement),
  #[serde(rename = "wireTap")]
  WireTap(XmlElement),
  #[serde(rename = "log")]
  Log(XmlElement),
  #[serde(rename = "setBody")]
  SetBody(XmlElement),
  #[serde(rename = "setHeader")]
  SetHeader(XmlElement),
  #[serde(rename = "transform")]
  Transform(XmlElement),
  #[serde(rename = "process")]
  Process(XmlElement),
  #[serde(rename = "bean")]
  Bean(XmlElement),
  #[serde(rename = "filter")]
  Filter(XmlElement),
  #[serde(rename = "choice")]
  Choice(XmlElement),
  #[serde(rename = "when")]
  When(XmlElement),
  #[serde(rename = "otherwise")]
  Otherwise(XmlElement),
  #[serde(rename = "split")]
  Split(XmlElement),
  #[serde(rename = "multicast")]
  Multicast(XmlElement),
  #[serde(rename = "loop")]
  Loop(XmlElement),
  #[serde(rename = "delay")]
  Delay(XmlElement),
  #[serde(rename = "stop")]
  Stop(XmlElement),
  #[serde(rename = "transacted")]
  Transacted(XmlElement),
  #[serde(rename = "policy")]
  Policy(XmlElement),
  #[serde(rename = "onException")]
  OnException(XmlElement),
  #[serde(rename = "onCompletion")]
  OnCompletion(XmlElement),
  #[serde(rename = "intercept")]
  Intercept(XmlElement),
  #[serde(rename = "interceptFrom")]
  InterceptFrom(XmlElement),
  #[serde(rename = "interceptSendToEndpoint")]
  InterceptSendToEndpoint(XmlElement),
}

impl XmlNode {
  fn new(kind: NodeKind, element: XmlElement) -> Self {
    match kind {
      NodeKind::Pipeline => XmlNode::Pipeline(element),
      NodeKind::To => XmlNode::To(element),
      NodeKind::ToDynamic => XmlNode::ToDynamic(element),
      NodeKind::WireTap => XmlNode::WireTap(element),
      NodeKind::Log => XmlNode::Log(element),
      NodeKind::SetBody => XmlNode::SetBody(element),
      NodeKind::SetHeader => XmlNode::SetHeader(element),
      NodeKind::Transform => XmlNode::Transform(element),
      NodeKind::Process => XmlNode::Process(element),
      NodeKind::Bean => XmlNode::Bean(element),
      NodeKind::Filter => XmlNode::Filter(element),
      NodeKind::Choice => XmlNode::Choice(element),
      NodeKind::When => XmlNode::When(element),
      NodeKind::Otherwise => XmlNode::Otherwise(element),
      NodeKind::Split => XmlNode::Split(element),
      NodeKind::Multicast => XmlNode::Multicast(element),
      NodeKind::Loop => XmlNode::Loop(element),
      NodeKind::Delay => XmlNode::Delay(element),
      NodeKind::Stop => XmlNode::Stop(element),
      NodeKind::Transacted => XmlNode::Transacted(element),
      NodeKind::Policy => XmlNode::Policy(element),
      NodeKind::OnException => XmlNode::OnException(element),
      NodeKind::OnCompletion => XmlNode::OnCompletion(element),
      NodeKind::Intercept => XmlNode::Intercept(element),
      NodeKind::InterceptFrom => XmlNode::InterceptFrom(element),
      NodeKind::InterceptSendToEndpoint => XmlNode::InterceptSendToEndpoint(element),
    }
  }
}

fn xml_node(route: &RouteDefinition, id: NodeId) -> XmlNode {
  let node = route.node(id);
  let element = XmlElement {
    id: node.id.clone(),
    uri: node.uri.clone(),
    reference: node.reference.clone(),
    expression: node.expression.as_ref().map(|e| XmlExpression {
      language: e.language.clone(),
      text: e.text.clone(),
    }),
    outputs: route
      .children(id)
      .iter()
      .map(|child| xml_node(route, *child))
      .collect(),
  };
  XmlNode::new(node.kind, element)
}

/// Renders `route` as XML.
pub fn dump_route_as_xml(route: &RouteDefinition) -> Result<String, DumpError> {
  let doc = XmlRoute {
    id: route.route_id().map(str::to_string),
    error_handler: route.error_handler().map(str::to_string),
    description: route.description().map(str::to_string),
    from: XmlFrom {
      uri: route.input().uri.clone(),
    },
    outputs: route
      .outputs()
      .iter()
      .map(|id| xml_node(route, *id))
      .collect(),
  };
  Ok(quick_xml::se::to_string(&doc)?)
}

/// Renders `route` as pretty-printed JSON in the routes-file format.
pub fn dump_route_as_json(route: &RouteDefinition) -> Result<String, DumpError> {
  Ok(serde_json::to_string_pretty(&route.to_spec())?)
}
