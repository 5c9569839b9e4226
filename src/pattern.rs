//! Glob-style pattern matching used by the match-by strategies.
//!
//! `*` matches any substring (including `/` and `:`), `?` matches exactly one character.
//! Matching is case-sensitive and an empty pattern never matches.

use regex::Regex;

/// A glob pattern compiled once and applied to many candidate strings.
#[derive(Debug, Clone)]
pub struct GlobPattern {
  raw: String,
  regex: Option<Regex>,
}

impl GlobPattern {
  pub fn new(pattern: impl Into<String>) -> Self {
    let raw = pattern.into();
    let regex = if has_wildcards(&raw) {
      Regex::new(&glob_to_regex(&raw)).ok()
    } else {
      None
    };
    Self { raw, regex }
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }

  /// True if the pattern is the lone `*` wildcard.
  pub fn is_match_all(&self) -> bool {
    self.raw == "*"
  }

  pub fn matches(&self, value: &str) -> bool {
    if self.raw.is_empty() {
      return false;
    }
    if value == self.raw {
      return true;
    }
    self.regex.as_ref().is_some_and(|r| r.is_match(value))
  }
}

/// One-shot convenience around [GlobPattern].
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
  GlobPattern::new(pattern).matches(value)
}

fn has_wildcards(pattern: &str) -> bool {
  pattern.contains(['*', '?'])
}

/// Translates a glob into an anchored regex, escaping every literal run.
pub(crate) fn glob_to_regex(pattern: &str) -> String {
  let mut out = String::from("(?s)^");
  let mut literal = String::new();
  for c in pattern.chars() {
    match c {
      '*' | '?' => {
        if !literal.is_empty() {
          out.push_str(&regex::escape(&literal));
          literal.clear();
        }
        out.push_str(if c == '*' { ".*" } else { "." });
      }
      _ => literal.push(c),
    }
  }
  if !literal.is_empty() {
    out.push_str(&regex::escape(&literal));
  }
  out.push('$');
  out
}
