use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  BinExpr, BinaryOp, CondExpr, Expr, Ident, IdentName, MemberExpr, MemberProp,
};

use crate::strings::string_literal;

/// `process.env.NODE_ENV`
fn node_env() -> Expr {
  let process = Expr::Ident(Ident::new(
    "process".into(),
    DUMMY_SP,
    SyntaxContext::empty(),
  ));

  let env = Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(process),
    prop: MemberProp::Ident(IdentName::new("env".into(), DUMMY_SP)),
  });

  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(env),
    prop: MemberProp::Ident(IdentName::new("NODE_ENV".into(), DUMMY_SP)),
  })
}

/// Builds `process.env.NODE_ENV === "production" ? production : development`.
///
/// The condition is evaluated when the generated code runs, so one build artifact serves both
/// environments.
pub fn branch(production: Expr, development: Expr) -> Expr {
  let test = Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::EqEqEq,
    left: Box::new(node_env()),
    right: Box::new(string_literal("production")),
  });

  Expr::Cond(CondExpr {
    span: DUMMY_SP,
    test: Box::new(test),
    cons: Box::new(production),
    alt: Box::new(development),
  })
}

/// A string that is empty in production and `value` everywhere else.
pub fn dev_only_string(value: &str) -> Expr {
  branch(string_literal(""), string_literal(value))
}
