use std::collections::HashSet;

use swc_core::ecma::ast::{Expr, Ident, Module, ModuleItem};
use swc_core::ecma::atoms::Atom;
use swc_core::ecma::utils::private_ident;
use swc_core::ecma::visit::{Visit, VisitWith};
use swc_core::quote;

use crate::strings::string_literal;

pub const STRINGIFIED_CSS_ERROR: &str = "You have tried to stringify object returned from `css` function. It isn't supposed to be used directly (e.g. as value of the `className` prop), but rather handed to emotion so it can handle it (e.g. as value of `css` prop).";

const GUARD_NAME: &str = "_EMOTION_STRINGIFIED_CSS_ERROR__";

/// State shared by every style call of one module.
///
/// Owned by the traversal and handed to each transform. The guard helper is created on first
/// request and reused afterwards.
#[derive(Debug, Default)]
pub struct CompilationUnitState {
  reserved_names: HashSet<Atom>,
  guard: Option<Ident>,
}

impl CompilationUnitState {
  pub fn new(reserved_names: HashSet<Atom>) -> Self {
    CompilationUnitState {
      reserved_names,
      guard: None,
    }
  }

  /// Reserves every identifier used in `module` so the guard helper never shadows user code.
  pub fn for_module(module: &Module) -> Self {
    let mut collector = IdentCollector::default();
    module.visit_with(&mut collector);
    CompilationUnitState::new(collector.names)
  }

  /// Identifier of the guard helper, created on first use.
  pub fn ensure_guard(&mut self) -> Ident {
    if let Some(guard) = &self.guard {
      return guard.clone();
    }

    let name = self.unique_name(GUARD_NAME);
    self.reserved_names.insert(name.clone());

    let guard = private_ident!(name);
    tracing::debug!(name = %guard.sym, "Created stringified css guard");
    self.guard = Some(guard.clone());
    guard
  }

  pub fn guard(&self) -> Option<&Ident> {
    self.guard.as_ref()
  }

  /// The helper declaration to prepend to the module, if any call needed it.
  pub fn guard_declaration(&self) -> Option<ModuleItem> {
    let guard = self.guard.clone()?;

    Some(quote!(
      "function $guard() { return $message; }" as ModuleItem,
      guard: Ident = guard,
      message: Expr = string_literal(STRINGIFIED_CSS_ERROR),
    ))
  }

  fn unique_name(&self, base: &str) -> Atom {
    let mut candidate: Atom = base.into();
    let mut suffix = 2;

    while self.reserved_names.contains(&candidate) {
      candidate = format!("{}{}", base, suffix).into();
      suffix += 1;
    }

    candidate
  }
}

#[derive(Default)]
struct IdentCollector {
  names: HashSet<Atom>,
}

impl Visit for IdentCollector {
  fn visit_ident(&mut self, ident: &Ident) {
    self.names.insert(ident.sym.clone());
  }
}
