use swc_core::common::util::take::Take;
use swc_core::common::Span;
use swc_core::ecma::ast::{CallExpr, Callee, Expr, ExprOrSpread};

use crate::template::expressions_from_template;

/// Rewrites `` tag`...` `` into the equivalent `tag(...)` call.
///
/// Returns the span of the template when a rewrite happened, so callers can still map back to it.
/// Any other expression, including an already normalized call, is left untouched.
pub fn normalize_tagged_template(expr: &mut Expr) -> Option<Span> {
  let Expr::TaggedTpl(tagged) = expr else {
    return None;
  };

  let template_span = tagged.tpl.span;
  let args = expressions_from_template(&tagged.tpl)
    .into_iter()
    .map(|expr| ExprOrSpread { spread: None, expr })
    .collect();

  *expr = Expr::Call(CallExpr {
    span: tagged.span,
    ctxt: tagged.ctxt,
    callee: Callee::Expr(tagged.tag.take()),
    args,
    type_args: tagged.type_params.take(),
  });

  Some(template_span)
}

#[cfg(test)]
mod tests {
  use atlaspack_swc_runner::test_utils::{run_test_visit, RunVisitResult};
  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use swc_core::ecma::visit::{VisitMut, VisitMutWith};

  use super::*;

  #[derive(Default)]
  struct Normalize {
    rewrites: usize,
  }

  impl VisitMut for Normalize {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
      expr.visit_mut_children_with(self);
      if normalize_tagged_template(expr).is_some() {
        self.rewrites += 1;
      }
    }
  }

  #[test]
  fn test_tagged_template_becomes_call() {
    let RunVisitResult { output_code, .. } = run_test_visit(
      indoc! {r#"
        const a = css`
          color: ${color};
          display: block;
        `;
      "#},
      |_| Normalize::default(),
    );

    assert_eq!(
      output_code,
      indoc! {r#"
        const a = css("color:", color, ";display:block;");
      "#}
    );
  }

  #[test]
  fn test_normalization_is_idempotent() {
    let RunVisitResult {
      output_code,
      visitor,
    } = run_test_visit(r#"css("color:", color, ";display:block;");"#, |_| {
      Normalize::default()
    });

    assert_eq!(visitor.rewrites, 0);
    assert_eq!(
      output_code,
      "css(\"color:\", color, \";display:block;\");\n"
    );
  }
}
