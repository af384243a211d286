use serde::Deserialize;

/// Controls when a resolved label is attached to the generated styles.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMode {
  /// Labels are never resolved.
  Never,
  /// Labels only exist in the development branch of the generated code.
  #[default]
  DevOnly,
  /// Labels are baked into the production output as well.
  Always,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCssConfig {
  ///
  /// When labels derived from the surrounding binding name are added.
  ///
  /// Defaults to `"dev-only"`
  ///
  #[serde(default)]
  pub auto_label: LabelMode,
  ///
  /// Template for the label. Supports `[local]`, `[filename]` and `[dirname]`.
  ///
  /// Defaults to `None`, which uses the local identifier only
  ///
  #[serde(default)]
  pub label_format: Option<String>,
  ///
  /// Attach inline source map comments to styles in development.
  ///
  /// Defaults to `true`
  ///
  #[serde(default = "default_source_map")]
  pub source_map: bool,
  ///
  /// Modules whose `css`, `keyframes` and `injectGlobal` exports are rewritten.
  ///
  /// Defaults to `["@emotion/react", "@emotion/css"]`
  ///
  #[serde(default = "default_import_sources")]
  pub import_sources: Vec<String>,
}

fn default_source_map() -> bool {
  true
}

fn default_import_sources() -> Vec<String> {
  vec!["@emotion/react".into(), "@emotion/css".into()]
}

impl Default for EmotionCssConfig {
  fn default() -> Self {
    EmotionCssConfig {
      auto_label: LabelMode::default(),
      label_format: None,
      source_map: default_source_map(),
      import_sources: default_import_sources(),
    }
  }
}
