use std::collections::HashMap;

use swc_core::common::comments::Comments;
use swc_core::common::sync::Lrc;
use swc_core::common::{Mark, SourceMapper};
use swc_core::ecma::ast::{
  AssignExpr, AssignTarget, Callee, ClassDecl, ClassExpr, ClassProp, Expr, FnDecl, FnExpr, Id,
  ImportDecl, ImportSpecifier, KeyValueProp, MemberProp, Module, ModuleDecl, ModuleExportName,
  ModuleItem, PropName, SimpleAssignTarget, VarDeclarator,
};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::config::EmotionCssConfig;
use crate::guard::CompilationUnitState;
use crate::source_map::SourceMapFragments;
use crate::transform::{CallSite, StyleTransformer};

/// The emotion exports this visitor rewrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StyleApi {
  Css,
  Keyframes,
  InjectGlobal,
}

impl StyleApi {
  fn from_export(name: &str) -> Option<Self> {
    match name {
      "css" => Some(StyleApi::Css),
      "keyframes" => Some(StyleApi::Keyframes),
      "injectGlobal" => Some(StyleApi::InjectGlobal),
      _ => None,
    }
  }

  fn should_label(self) -> bool {
    self == StyleApi::Css
  }

  /// `injectGlobal` is called for its side effect, so it must never be dropped as unused.
  fn may_annotate_pure(self) -> bool {
    self != StyleApi::InjectGlobal
  }
}

/// SWC visitor that compiles emotion `css`, `keyframes` and `injectGlobal` calls.
///
/// Static styles are serialized at build time into the `{ name, styles }` objects the emotion
/// runtime expects. Dynamic styles keep their call, gain a label and source map argument for the
/// runtime serializer, and are marked `/*#__PURE__*/` when that is safe.
///
/// # Example
///
/// ```text
/// import { css } from "@emotion/react";
/// const Button = css`color: red;`;
/// ```
/// becomes
/// ```text
/// import { css } from "@emotion/react";
/// const Button = { name: "hwfcu5", styles: "color:red" };
/// ```
pub struct EmotionCssVisitor {
  unresolved_mark: Mark,
  config: EmotionCssConfig,
  filename: Option<String>,
  source_map: Option<Lrc<dyn SourceMapper>>,
  comments: Option<Box<dyn Comments>>,

  imports: HashMap<Id, StyleApi>,
  label_context: Vec<String>,
  unit: CompilationUnitState,
  source_maps: Option<SourceMapFragments>,
}

impl EmotionCssVisitor {
  pub fn new(unresolved_mark: Mark, config: EmotionCssConfig) -> Self {
    EmotionCssVisitor {
      unresolved_mark,
      config,
      filename: None,
      source_map: None,
      comments: None,

      imports: HashMap::new(),
      label_context: vec![],
      unit: CompilationUnitState::default(),
      source_maps: None,
    }
  }

  /// Path of the module being compiled, used for label formats and source maps.
  pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
    self.filename = Some(filename.into());
    self
  }

  /// Source map of the host compiler, required for inline style source maps.
  pub fn with_source_map(mut self, source_map: Lrc<dyn SourceMapper>) -> Self {
    self.source_map = Some(source_map);
    self
  }

  /// Comments store receiving `/*#__PURE__*/` annotations.
  pub fn with_comments(mut self, comments: impl Comments + 'static) -> Self {
    self.comments = Some(Box::new(comments));
    self
  }

  fn style_api(&self, expr: &Expr) -> Option<StyleApi> {
    let callee = match expr {
      Expr::TaggedTpl(tagged) => &tagged.tag,
      Expr::Call(call) => match &call.callee {
        Callee::Expr(callee) => callee,
        _ => return None,
      },
      _ => return None,
    };

    let Expr::Ident(ident) = &**callee else {
      return None;
    };

    self.imports.get(&ident.to_id()).copied()
  }

  fn in_label_context(&mut self, name: Option<String>, visit: impl FnOnce(&mut Self)) {
    let Some(name) = name else {
      visit(self);
      return;
    };

    self.label_context.push(name);
    visit(self);
    self.label_context.pop();
  }

  fn annotate_pure(&self, expr: &Expr) {
    let (Some(comments), Expr::Call(call)) = (&self.comments, expr) else {
      return;
    };

    if !call.span.is_dummy() {
      comments.add_pure_comment(call.span.lo);
    }
  }

  fn source_map_fragments(&self) -> Option<SourceMapFragments> {
    if !self.config.source_map {
      return None;
    }

    match (&self.source_map, &self.filename) {
      (Some(source_map), Some(filename)) => {
        Some(SourceMapFragments::new(source_map.clone(), filename.clone()))
      }
      _ => None,
    }
  }
}

fn is_style_import(import: &ImportDecl, import_sources: &[String]) -> bool {
  !import.type_only
    && import_sources
      .iter()
      .any(|source| source.as_str() == &*import.src.value)
}

/// Local bindings of the style APIs imported from the configured sources.
fn collect_style_imports(module: &Module, import_sources: &[String]) -> HashMap<Id, StyleApi> {
  module
    .body
    .iter()
    .filter_map(|item| match item {
      ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
      _ => None,
    })
    .filter(|import| is_style_import(import, import_sources))
    .flat_map(|import| import.specifiers.iter())
    .filter_map(|specifier| {
      let ImportSpecifier::Named(named) = specifier else {
        return None;
      };
      if named.is_type_only {
        return None;
      }

      let exported = match &named.imported {
        Some(ModuleExportName::Ident(ident)) => &ident.sym,
        Some(ModuleExportName::Str(str)) => &str.value,
        None => &named.local.sym,
      };

      StyleApi::from_export(exported).map(|api| (named.local.to_id(), api))
    })
    .collect()
}

fn prop_name(name: &PropName) -> Option<String> {
  match name {
    PropName::Ident(ident) => Some(ident.sym.to_string()),
    PropName::Str(str) => Some(str.value.to_string()),
    _ => None,
  }
}

impl VisitMut for EmotionCssVisitor {
  fn visit_mut_module(&mut self, module: &mut Module) {
    self.imports = collect_style_imports(module, &self.config.import_sources);
    if self.imports.is_empty() {
      tracing::trace!(filename = ?self.filename, "No emotion imports, skipping module");
      return;
    }

    tracing::debug!(
      filename = ?self.filename,
      bindings = self.imports.len(),
      "Compiling emotion styles"
    );

    self.unit = CompilationUnitState::for_module(module);
    self.source_maps = self.source_map_fragments();

    module.visit_mut_children_with(self);

    if let Some(declaration) = self.unit.guard_declaration() {
      module.body.insert(0, declaration);
    }
  }

  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    expr.visit_mut_children_with(self);

    let Some(api) = self.style_api(expr) else {
      return;
    };

    let transformer = StyleTransformer {
      config: &self.config,
      unresolved_mark: self.unresolved_mark,
      source_maps: self.source_maps.as_ref(),
      filename: self.filename.as_deref(),
    };
    let call_site = CallSite {
      should_label: api.should_label(),
      identifier: self.label_context.last().map(String::as_str),
    };

    let outcome = transformer.transform(expr, &call_site, &mut self.unit);
    match outcome.replacement {
      Some(replacement) => *expr = replacement,
      None if outcome.is_pure && api.may_annotate_pure() => self.annotate_pure(expr),
      None => {}
    }
  }

  fn visit_mut_var_declarator(&mut self, declarator: &mut VarDeclarator) {
    let name = declarator
      .name
      .as_ident()
      .map(|binding| binding.id.sym.to_string());

    self.in_label_context(name, |visitor| {
      declarator.visit_mut_children_with(visitor)
    });
  }

  fn visit_mut_assign_expr(&mut self, assign: &mut AssignExpr) {
    let name = match &assign.left {
      AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => Some(binding.id.sym.to_string()),
      AssignTarget::Simple(SimpleAssignTarget::Member(member)) => match &member.prop {
        MemberProp::Ident(prop) => Some(prop.sym.to_string()),
        _ => None,
      },
      _ => None,
    };

    self.in_label_context(name, |visitor| assign.visit_mut_children_with(visitor));
  }

  fn visit_mut_key_value_prop(&mut self, prop: &mut KeyValueProp) {
    let name = prop_name(&prop.key);
    self.in_label_context(name, |visitor| prop.visit_mut_children_with(visitor));
  }

  fn visit_mut_class_prop(&mut self, prop: &mut ClassProp) {
    let name = prop_name(&prop.key);
    self.in_label_context(name, |visitor| prop.visit_mut_children_with(visitor));
  }

  fn visit_mut_fn_decl(&mut self, decl: &mut FnDecl) {
    let name = Some(decl.ident.sym.to_string());
    self.in_label_context(name, |visitor| decl.visit_mut_children_with(visitor));
  }

  fn visit_mut_fn_expr(&mut self, expr: &mut FnExpr) {
    let name = expr.ident.as_ref().map(|ident| ident.sym.to_string());
    self.in_label_context(name, |visitor| expr.visit_mut_children_with(visitor));
  }

  fn visit_mut_class_decl(&mut self, decl: &mut ClassDecl) {
    let name = Some(decl.ident.sym.to_string());
    self.in_label_context(name, |visitor| decl.visit_mut_children_with(visitor));
  }

  fn visit_mut_class_expr(&mut self, expr: &mut ClassExpr) {
    let name = expr.ident.as_ref().map(|ident| ident.sym.to_string());
    self.in_label_context(name, |visitor| expr.visit_mut_children_with(visitor));
  }
}
