use std::mem;

use swc_core::common::Mark;
use swc_core::ecma::ast::{CallExpr, Expr};

use crate::object_to_string::simplify_object;
use crate::purity::is_pure;
use crate::strings::join_string_literals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifiedArguments {
  /// No argument can have side effects.
  pub is_pure: bool,
  /// No spread argument is present, so trailing strings land at a known position.
  pub can_append_strings: bool,
}

/// Classifies the purity of every argument, turns static style objects into css strings and
/// merges the adjacent string literals that result.
pub fn simplify_arguments(call: &mut CallExpr, unresolved_mark: Mark) -> SimplifiedArguments {
  let can_append_strings = call.args.iter().all(|arg| arg.spread.is_none());
  let mut all_pure = true;

  for arg in &mut call.args {
    if !is_pure(&arg.expr, unresolved_mark) {
      all_pure = false;
    }

    if arg.spread.is_some() {
      continue;
    }

    if let Expr::Object(object) = &*arg.expr {
      if let Some(simplified) = simplify_object(object) {
        *arg.expr = simplified;
      }
    }
  }

  call.args = join_string_literals(mem::take(&mut call.args));

  SimplifiedArguments {
    is_pure: all_pure,
    can_append_strings,
  }
}
