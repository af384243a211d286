use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{CallExpr, Expr, ExprOrSpread, Lit, Str};

pub(crate) fn string_literal(value: &str) -> Expr {
  Expr::Lit(Lit::Str(Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }))
}

/// Returns the string literal held by a non-spread argument.
pub(crate) fn as_string_literal(arg: &ExprOrSpread) -> Option<&Str> {
  match (&arg.spread, &*arg.expr) {
    (None, Expr::Lit(Lit::Str(str))) => Some(str),
    _ => None,
  }
}

/// Merges runs of adjacent string literal arguments into a single literal.
///
/// Every other argument keeps its relative position.
pub fn join_string_literals(args: Vec<ExprOrSpread>) -> Vec<ExprOrSpread> {
  let mut joined: Vec<ExprOrSpread> = Vec::with_capacity(args.len());

  for arg in args {
    let Some(current) = as_string_literal(&arg) else {
      joined.push(arg);
      continue;
    };

    let previous = joined.last_mut().and_then(|last| match (&last.spread, &mut *last.expr) {
      (None, Expr::Lit(Lit::Str(str))) => Some(str),
      _ => None,
    });

    match previous {
      Some(previous) => {
        previous.value = format!("{}{}", previous.value, current.value).into();
        previous.raw = None;
      }
      None => joined.push(arg),
    }
  }

  joined
}

/// Appends one more string-returning argument to a call.
///
/// Used to ship labels and source maps to the runtime serializer when the styles can not be
/// resolved at build time.
pub fn append_string_argument(call: &mut CallExpr, expr: Expr) {
  call.args.push(ExprOrSpread {
    spread: None,
    expr: Box::new(expr),
  });
}
