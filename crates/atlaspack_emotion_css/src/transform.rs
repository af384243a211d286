use swc_core::common::{BytePos, Mark, DUMMY_SP};
use swc_core::ecma::ast::{
  CallExpr, Expr, Ident, IdentName, KeyValueProp, ObjectLit, Prop, PropName, PropOrSpread,
};

use crate::arguments::{simplify_arguments, SimplifiedArguments};
use crate::config::{EmotionCssConfig, LabelMode};
use crate::env_conditional::{branch, dev_only_string};
use crate::guard::CompilationUnitState;
use crate::label::resolve_label;
use crate::normalize::normalize_tagged_template;
use crate::serialize::{serialize_styles, StyleIdentity};
use crate::source_map::SourceMapFragments;
use crate::strings::{append_string_argument, as_string_literal, string_literal};

/// What the traversal should do with a processed style expression.
#[derive(Debug)]
pub struct TransformOutcome {
  /// Replaces the expression entirely. When `None` the expression stays where it is, possibly
  /// with its arguments rewritten.
  pub replacement: Option<Expr>,
  /// Whether the resulting expression is free of side effects.
  pub is_pure: bool,
}

impl TransformOutcome {
  fn unchanged() -> Self {
    TransformOutcome {
      replacement: None,
      is_pure: false,
    }
  }
}

/// Per call site inputs to the transform.
#[derive(Debug, Default)]
pub struct CallSite<'a> {
  /// Whether this kind of style call carries a label at all.
  pub should_label: bool,
  /// Name of the binding the call is assigned to, if any.
  pub identifier: Option<&'a str>,
}

/// Rewrites a single `css` call or tagged template into its cheapest runtime form.
pub struct StyleTransformer<'a> {
  pub config: &'a EmotionCssConfig,
  pub unresolved_mark: Mark,
  /// Set when source maps are enabled and the module location is known.
  pub source_maps: Option<&'a SourceMapFragments>,
  pub filename: Option<&'a str>,
}

impl StyleTransformer<'_> {
  /// Transforms `expr` in place and reports whether it should be replaced.
  ///
  /// A call with a single static string argument is serialized at build time. Any other call keeps
  /// its arguments for the runtime serializer, with the label and source map appended as extra
  /// string arguments. Expressions that are neither calls nor tagged templates are left alone.
  pub fn transform(
    &self,
    expr: &mut Expr,
    call_site: &CallSite<'_>,
    unit: &mut CompilationUnitState,
  ) -> TransformOutcome {
    let mut source_map = None;
    if let Some(template_span) = normalize_tagged_template(expr) {
      source_map = self.source_map_at(template_span.lo);
    }

    let Expr::Call(call) = expr else {
      tracing::trace!("Not a style call, leaving expression as is");
      return TransformOutcome::unchanged();
    };

    let SimplifiedArguments {
      is_pure,
      can_append_strings,
    } = simplify_arguments(call, self.unresolved_mark);

    if can_append_strings && source_map.is_none() {
      source_map = self.source_map_at(call.span.lo);
    }

    let label = self.label(call_site);

    if let Some(css) = sole_string_argument(call) {
      let replacement = self.static_styles(&css, label.as_deref(), source_map.as_deref(), unit);
      return TransformOutcome {
        replacement: Some(replacement),
        is_pure: true,
      };
    }

    tracing::debug!(
      label = label.as_deref(),
      can_append_strings,
      is_pure,
      "Leaving styles for the runtime serializer"
    );

    if can_append_strings {
      if let Some(label) = &label {
        let label_string = format!(";label:{}", label);
        match self.config.auto_label {
          LabelMode::DevOnly => append_string_argument(call, dev_only_string(&label_string)),
          LabelMode::Always => append_string_argument(call, string_literal(&label_string)),
          LabelMode::Never => {}
        }
      }

      if let Some(source_map) = &source_map {
        append_string_argument(call, dev_only_string(source_map));
      }
    }

    TransformOutcome {
      replacement: None,
      is_pure,
    }
  }

  fn label(&self, call_site: &CallSite<'_>) -> Option<String> {
    if !call_site.should_label || self.config.auto_label == LabelMode::Never {
      return None;
    }

    resolve_label(
      call_site.identifier?,
      self.config.label_format.as_deref(),
      self.filename,
    )
  }

  fn source_map_at(&self, pos: BytePos) -> Option<String> {
    if !self.config.source_map {
      return None;
    }

    self.source_maps?.fragment(pos)
  }

  /// Serializes a fully static css string into `{ name, styles }`.
  ///
  /// With a source map the object is split into a production object and a development object
  /// that also carries the map, the dev-only label and the stringification guard.
  fn static_styles(
    &self,
    css: &str,
    label: Option<&str>,
    source_map: Option<&str>,
    unit: &mut CompilationUnitState,
  ) -> Expr {
    let css = css.strip_suffix(';').unwrap_or(css);

    let production_label = match label {
      Some(label) if self.config.auto_label == LabelMode::Always => format!(";label:{};", label),
      _ => String::new(),
    };
    let production = serialize_styles(&[css, &production_label]);

    tracing::debug!(name = %production.name, "Serialized static styles");

    let Some(source_map) = source_map else {
      return style_object(&production, None);
    };

    let guard = unit.ensure_guard();
    let development = match label {
      Some(label) => serialize_styles(&[css, &format!(";label:{};", label)]),
      None => production.clone(),
    };

    branch(
      style_object(&production, None),
      style_object(&development, Some((source_map, &guard))),
    )
  }
}

fn sole_string_argument(call: &CallExpr) -> Option<String> {
  match call.args.as_slice() {
    [arg] => as_string_literal(arg).map(|str| str.value.to_string()),
    _ => None,
  }
}

fn key_value(key: &str, value: Expr) -> PropOrSpread {
  PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
    key: PropName::Ident(IdentName::new(key.into(), DUMMY_SP)),
    value: Box::new(value),
  })))
}

fn style_object(identity: &StyleIdentity, development: Option<(&str, &Ident)>) -> Expr {
  let mut props = vec![
    key_value("name", string_literal(&identity.name)),
    key_value("styles", string_literal(&identity.styles)),
  ];

  if let Some((source_map, guard)) = development {
    props.push(key_value("map", string_literal(source_map)));
    props.push(key_value("toString", Expr::Ident(guard.clone())));
  }

  Expr::Object(ObjectLit {
    span: DUMMY_SP,
    props,
  })
}

#[cfg(test)]
mod tests {
  use atlaspack_swc_runner::runner::RunWithTransformationOptions;
  use atlaspack_swc_runner::test_utils::{
    remove_code_whitespace, run_test_visit, RunTestContext, RunVisitResult,
  };
  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use swc_core::ecma::ast::Module;
  use swc_core::ecma::visit::{VisitMut, VisitMutWith};

  use super::*;

  /// Runs the transform on every `css` call or tagged template, labelling with a fixed name.
  struct Harness {
    config: EmotionCssConfig,
    unresolved_mark: Mark,
    source_maps: Option<SourceMapFragments>,
    label: Option<&'static str>,
    unit: CompilationUnitState,
    purity: Vec<bool>,
  }

  impl Harness {
    fn new(context: RunTestContext, config: EmotionCssConfig, label: Option<&'static str>) -> Self {
      let source_maps = context
        .filename
        .clone()
        .map(|filename| SourceMapFragments::new(context.source_map.clone(), filename));

      Harness {
        config,
        unresolved_mark: context.unresolved_mark,
        source_maps,
        label,
        unit: CompilationUnitState::default(),
        purity: vec![],
      }
    }
  }

  fn is_css(expr: &Expr) -> bool {
    let tag = match expr {
      Expr::TaggedTpl(tagged) => &tagged.tag,
      Expr::Call(call) => match call.callee.as_expr() {
        Some(callee) => callee,
        None => return false,
      },
      _ => return false,
    };
    matches!(&**tag, Expr::Ident(ident) if &*ident.sym == "css")
  }

  impl VisitMut for Harness {
    fn visit_mut_module(&mut self, module: &mut Module) {
      module.visit_mut_children_with(self);
      if let Some(declaration) = self.unit.guard_declaration() {
        module.body.insert(0, declaration);
      }
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
      expr.visit_mut_children_with(self);
      if !is_css(expr) {
        return;
      }

      let transformer = StyleTransformer {
        config: &self.config,
        unresolved_mark: self.unresolved_mark,
        source_maps: self.source_maps.as_ref(),
        filename: Some("Button.js"),
      };
      let call_site = CallSite {
        should_label: true,
        identifier: self.label,
      };

      let outcome = transformer.transform(expr, &call_site, &mut self.unit);
      self.purity.push(outcome.is_pure);
      if let Some(replacement) = outcome.replacement {
        *expr = replacement;
      }
    }
  }

  fn config(auto_label: LabelMode, source_map: bool) -> EmotionCssConfig {
    EmotionCssConfig {
      auto_label,
      source_map,
      ..Default::default()
    }
  }

  fn run(code: &str, config: EmotionCssConfig, label: Option<&'static str>) -> (String, Vec<bool>) {
    let RunVisitResult {
      output_code,
      visitor,
    } = run_test_visit(code, |context| Harness::new(context, config, label));
    (remove_code_whitespace(&output_code), visitor.purity)
  }

  fn run_with_source_maps(code: &str, label_mode: LabelMode) -> (String, Harness) {
    let options = RunWithTransformationOptions {
      code,
      filename: Some("Button.js"),
      syntax: None,
    };
    let RunVisitResult {
      output_code,
      visitor,
    } = run_test_visit(options, |context| {
      Harness::new(context, config(label_mode, true), Some("Button"))
    });
    (remove_code_whitespace(&output_code), visitor)
  }

  #[test]
  fn test_static_template_is_serialized() {
    let (code, purity) = run(
      "const styles = css`color: red;`;",
      config(LabelMode::Never, false),
      None,
    );

    let expected = serialize_styles(&["color:red"]);
    assert_eq!(
      code,
      remove_code_whitespace(&format!(
        r#"
          const styles = {{
              name: "{}",
              styles: "{}"
          }};
        "#,
        expected.name, expected.styles
      ))
    );
    assert_eq!(purity, vec![true]);
  }

  #[test]
  fn test_fast_path_is_deterministic() {
    let input = "const a = css`color: red;`; const b = css`color: red;`;";
    let (first, _) = run(input, config(LabelMode::Never, false), None);
    let (second, _) = run(input, config(LabelMode::Never, false), None);

    assert_eq!(first, second);
    assert_eq!(
      first,
      remove_code_whitespace(
        r#"
          const a = {
              name: "hwfcu5",
              styles: "color:red"
          };
          const b = {
              name: "hwfcu5",
              styles: "color:red"
          };
        "#
      )
    );
  }

  #[test]
  fn test_always_label_is_serialized_into_production_styles() {
    let (code, _) = run(
      r#"const styles = css("color:red;");"#,
      config(LabelMode::Always, false),
      Some("Button"),
    );

    assert_eq!(
      code,
      remove_code_whitespace(
        r#"
          const styles = {
              name: "1l9rxjn-Button",
              styles: "color:red;label:Button;"
          };
        "#
      )
    );
  }

  #[test]
  fn test_dev_only_label_is_absent_without_source_map() {
    let (code, _) = run(
      r#"const styles = css("color:red;");"#,
      config(LabelMode::DevOnly, false),
      Some("Button"),
    );

    assert_eq!(
      code,
      remove_code_whitespace(
        r#"
          const styles = {
              name: "hwfcu5",
              styles: "color:red"
          };
        "#
      )
    );
  }

  #[test]
  fn test_source_map_splits_production_and_development() {
    let (code, harness) = run_with_source_maps(
      indoc! {r#"
        const a = css`color: red;`;
        const b = css`color: red;`;
      "#},
      LabelMode::DevOnly,
    );

    let guard = harness.unit.guard().unwrap().sym.to_string();
    assert_eq!(guard, "_EMOTION_STRINGIFIED_CSS_ERROR__");

    // One helper, referenced by both development objects
    assert_eq!(code.matches("function _EMOTION_STRINGIFIED_CSS_ERROR__()").count(), 1);
    assert_eq!(code.matches("toString: _EMOTION_STRINGIFIED_CSS_ERROR__").count(), 2);
    assert_eq!(
      code
        .matches(r#"process.env.NODE_ENV === "production" ? {"#)
        .count(),
      2
    );

    // Production keeps the unlabelled identity, development carries the label and map
    assert_eq!(code.matches(r#"name: "hwfcu5","#).count(), 2);
    assert_eq!(code.matches(r#"name: "1l9rxjn-Button","#).count(), 2);
    assert_eq!(code.matches(r#"styles: "color:red;label:Button;","#).count(), 2);
    assert_eq!(
      code
        .matches("map: \"/*# sourceMappingURL=data:application/json;charset=utf-8;base64,")
        .count(),
      2
    );
  }

  #[test]
  fn test_always_label_with_source_map_labels_both_branches() {
    let (code, harness) =
      run_with_source_maps("const a = css`color: red;`;", LabelMode::Always);

    assert!(harness.unit.guard().is_some());
    assert!(code.contains(&remove_code_whitespace(
      r#"
        const a = process.env.NODE_ENV === "production" ? {
            name: "1l9rxjn-Button",
            styles: "color:red;label:Button;"
        } : {
            name: "1l9rxjn-Button",
            styles: "color:red;label:Button;",
            map: "/*# sourceMappingURL=data:application/json;charset=utf-8;base64,
      "#
    )));
    assert_eq!(code.matches("label:Button;label:Button").count(), 0);
    assert!(code.contains("toString: _EMOTION_STRINGIFIED_CSS_ERROR__"));
  }

  #[test]
  fn test_dynamic_argument_gets_dev_only_label() {
    let (code, purity) = run(
      r#"const styles = css(getStyles());"#,
      config(LabelMode::DevOnly, false),
      Some("Foo"),
    );

    assert_eq!(
      code,
      remove_code_whitespace(
        r#"
          const styles = css(getStyles(), process.env.NODE_ENV === "production" ? "" : ";label:Foo");
        "#
      )
    );
    assert_eq!(purity, vec![false]);
  }

  #[test]
  fn test_dynamic_argument_gets_always_label() {
    let (code, _) = run(
      r#"const color = "red"; const styles = css`color: ${color};`;"#,
      config(LabelMode::Always, false),
      Some("Foo"),
    );

    assert_eq!(
      code,
      remove_code_whitespace(
        r#"
          const color = "red";
          const styles = css("color:", color, ";", ";label:Foo");
        "#
      )
    );
  }

  #[test]
  fn test_never_mode_appends_nothing() {
    let (code, _) = run(
      "const styles = css(getStyles());",
      config(LabelMode::Never, false),
      Some("Foo"),
    );

    assert_eq!(code, "const styles = css(getStyles());");
  }

  #[test]
  fn test_dynamic_call_gets_source_map_argument() {
    let (code, harness) = run_with_source_maps(
      "const styles = css(getStyles());",
      LabelMode::Never,
    );

    assert!(code.starts_with(
      r#"const styles = css(getStyles(), process.env.NODE_ENV === "production" ? "" : "/*# sourceMappingURL="#
    ));
    assert!(harness.unit.guard().is_none());
  }

  #[test]
  fn test_spread_never_receives_appended_arguments() {
    let (code, harness) = run_with_source_maps(
      "const parts = []; const styles = css(...parts);",
      LabelMode::Always,
    );

    assert_eq!(code, "const parts = [];\nconst styles = css(...parts);");
    assert_eq!(harness.purity, vec![true]);
  }

  #[test]
  fn test_purity_of_string_and_impure_calls() {
    let (_, purity) = run(
      r#"css("color:red;"); css(sideEffect()); css({ color: "red" }, getStyles());"#,
      config(LabelMode::Never, false),
      None,
    );

    assert_eq!(purity, vec![true, false, false]);
  }

  #[test]
  fn test_interpolation_in_comment_keeps_call_impure() {
    let (code, purity) = run(
      "const styles = css`color: red; /* ${sideEffect()} */`;",
      config(LabelMode::Never, false),
      None,
    );

    assert_eq!(code, r#"const styles = css("color:red;", sideEffect());"#);
    assert_eq!(purity, vec![false]);
  }

  #[test]
  fn test_other_shapes_are_unchanged() {
    let config = config(LabelMode::Always, true);
    let transformer = StyleTransformer {
      config: &config,
      unresolved_mark: Mark::root(),
      source_maps: None,
      filename: None,
    };
    let mut expr = string_literal("color:red;");
    let mut unit = CompilationUnitState::default();

    let outcome = transformer.transform(
      &mut expr,
      &CallSite {
        should_label: true,
        identifier: Some("Foo"),
      },
      &mut unit,
    );

    assert!(outcome.replacement.is_none());
    assert!(!outcome.is_pure);
    assert!(unit.guard().is_none());
  }
}
