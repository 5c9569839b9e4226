//! Declarative expression attached to a node (evaluation happens elsewhere).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Expression in some language, e.g. `simple{${body}}` or `jsonpath{$.store.book}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
  pub language: String,
  pub text: String,
}

impl Expression {
  pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      language: language.into(),
      text: text.into(),
    }
  }

  pub fn simple(text: impl Into<String>) -> Self {
    Self::new("simple", text)
  }

  pub fn constant(text: impl Into<String>) -> Self {
    Self::new("constant", text)
  }

  pub fn header(name: impl Into<String>) -> Self {
    Self::new("header", name)
  }

  /// A JsonPath query; only the declaration is modelled here.
  pub fn jsonpath(text: impl Into<String>) -> Self {
    Self::new("jsonpath", text)
  }
}

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{{{}}}", self.language, self.text)
  }
}

#[cfg(test)]
mod tests {
  use super::Expression;

  #[test]
  fn display_wraps_text_in_language() {
    assert_eq!(Expression::simple("${body}").to_string(), "simple{${body}}");
    assert_eq!(
      Expression::jsonpath("$.store.book[*]").to_string(),
      "jsonpath{$.store.book[*]}"
    );
  }

  #[test]
  fn constructors_set_language() {
    assert_eq!(Expression::constant("x").language, "constant");
    assert_eq!(Expression::header("foo").text, "foo");
  }
}
