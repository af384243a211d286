use swc_core::common::Mark;
use swc_core::ecma::ast::{
  ArrayLit, Class, ClassMember, Expr, Ident, Lit, ObjectLit, Prop, PropName, PropOrSpread,
  UnaryOp,
};

/// Conservative side-effect analysis for style call arguments.
///
/// An expression is pure when evaluating it can neither run user code nor observe a global that
/// might not exist. Anything this does not recognise is impure.
pub fn is_pure(expr: &Expr, unresolved_mark: Mark) -> bool {
  PurityChecker { unresolved_mark }.expr(expr)
}

struct PurityChecker {
  unresolved_mark: Mark,
}

impl PurityChecker {
  fn expr(&self, expr: &Expr) -> bool {
    match expr {
      Expr::Lit(Lit::Regex(_)) => false,
      Expr::Lit(_) => true,
      Expr::Ident(ident) => self.ident(ident),
      Expr::This(_) | Expr::Fn(_) | Expr::Arrow(_) => true,
      Expr::Tpl(tpl) => tpl.exprs.iter().all(|expr| self.expr(expr)),
      Expr::Array(array) => self.array(array),
      Expr::Object(object) => self.object(object),
      Expr::Class(class) => self.class(&class.class),
      Expr::Unary(unary) => match unary.op {
        UnaryOp::Delete => false,
        _ => self.expr(&unary.arg),
      },
      Expr::Bin(bin) => self.expr(&bin.left) && self.expr(&bin.right),
      Expr::Cond(cond) => self.expr(&cond.test) && self.expr(&cond.cons) && self.expr(&cond.alt),
      Expr::Seq(seq) => seq.exprs.iter().all(|expr| self.expr(expr)),
      Expr::Paren(paren) => self.expr(&paren.expr),
      _ => false,
    }
  }

  /// Identifiers are pure when bound in the module. Globals may throw when read.
  fn ident(&self, ident: &Ident) -> bool {
    ident.ctxt.outer() != self.unresolved_mark
  }

  fn array(&self, array: &ArrayLit) -> bool {
    array
      .elems
      .iter()
      .flatten()
      .all(|elem| elem.spread.is_none() && self.expr(&elem.expr))
  }

  fn object(&self, object: &ObjectLit) -> bool {
    object.props.iter().all(|prop| match prop {
      PropOrSpread::Spread(_) => false,
      PropOrSpread::Prop(prop) => match &**prop {
        Prop::Shorthand(ident) => self.ident(ident),
        Prop::KeyValue(key_value) => {
          self.prop_name(&key_value.key) && self.expr(&key_value.value)
        }
        Prop::Method(method) => self.prop_name(&method.key),
        Prop::Getter(getter) => self.prop_name(&getter.key),
        Prop::Setter(setter) => self.prop_name(&setter.key),
        Prop::Assign(_) => false,
      },
    })
  }

  fn prop_name(&self, name: &PropName) -> bool {
    match name {
      PropName::Computed(computed) => self.expr(&computed.expr),
      _ => true,
    }
  }

  fn class(&self, class: &Class) -> bool {
    if let Some(super_class) = &class.super_class {
      if !self.expr(super_class) {
        return false;
      }
    }

    if !class.decorators.is_empty() {
      return false;
    }

    // Computed keys run when the class is defined
    class.body.iter().all(|member| match member {
      ClassMember::Method(method) => !method.key.is_computed(),
      ClassMember::ClassProp(prop) => {
        let value_is_pure = match &prop.value {
          Some(value) if prop.is_static => self.expr(value),
          _ => true,
        };
        !prop.key.is_computed() && value_is_pure
      }
      ClassMember::StaticBlock(_) => false,
      _ => true,
    })
  }
}
