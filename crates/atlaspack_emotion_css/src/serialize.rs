use once_cell::sync::Lazy;
use regex::Regex;

use crate::hash::hash;

static LABEL_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"label:\s*([^\s;{]+)\s*(;|$)").unwrap());

/// Canonical identity of one set of static declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleIdentity {
  pub name: String,
  pub styles: String,
}

/// Serializes static css fragments the same way the emotion runtime does.
///
/// The fragments are concatenated into `styles`. The `name` is the hash of `styles` followed by
/// `-<label>` for every `label:` declaration, in source order.
pub fn serialize_styles(fragments: &[&str]) -> StyleIdentity {
  let styles = fragments.concat();

  let mut name = hash(&styles);
  for captures in LABEL_PATTERN.captures_iter(&styles) {
    name.push('-');
    name.push_str(&captures[1]);
  }

  StyleIdentity { name, styles }
}
