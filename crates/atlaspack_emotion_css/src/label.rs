use std::path::Path;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static UNSAFE_LABEL_CHARACTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s./]+").unwrap());
static LOCAL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[local\]").unwrap());
static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[filename\]").unwrap());
static DIRNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[dirname\]").unwrap());

fn sanitize_label_part(part: &str) -> String {
  UNSAFE_LABEL_CHARACTERS
    .replace_all(part.trim(), "-")
    .into_owned()
}

/// Resolves the label for a style call from the name of the binding it is assigned to.
///
/// Names starting with `_` are usually compiler generated and never produce a label.
pub fn resolve_label(
  identifier: &str,
  label_format: Option<&str>,
  filename: Option<&str>,
) -> Option<String> {
  if identifier.is_empty() || identifier.starts_with('_') {
    return None;
  }

  let local = sanitize_label_part(identifier);
  let Some(label_format) = label_format else {
    return Some(local);
  };

  let path = Path::new(filename.unwrap_or_default());
  let dirname = path
    .parent()
    .and_then(|parent| parent.file_name())
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();
  let mut file_stem = path
    .file_stem()
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default();
  if file_stem == "index" {
    file_stem = dirname.clone();
  }

  let label = LOCAL_PATTERN.replace_all(label_format, NoExpand(&local));
  let label = FILENAME_PATTERN.replace_all(&label, NoExpand(&sanitize_label_part(&file_stem)));
  let label = DIRNAME_PATTERN.replace_all(&label, NoExpand(&sanitize_label_part(&dirname)));

  Some(label.into_owned())
}
