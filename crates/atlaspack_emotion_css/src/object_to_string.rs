use swc_core::ecma::ast::{Expr, Lit, ObjectLit, Prop, PropName, PropOrSpread, Str};

/// Properties whose numeric values are emitted without a `px` unit.
const UNITLESS_PROPERTIES: &[&str] = &[
  "animationIterationCount",
  "aspectRatio",
  "borderImageOutset",
  "borderImageSlice",
  "borderImageWidth",
  "boxFlex",
  "boxFlexGroup",
  "boxOrdinalGroup",
  "columnCount",
  "columns",
  "flex",
  "flexGrow",
  "flexPositive",
  "flexShrink",
  "flexNegative",
  "flexOrder",
  "gridArea",
  "gridRow",
  "gridRowEnd",
  "gridRowSpan",
  "gridRowStart",
  "gridColumn",
  "gridColumnEnd",
  "gridColumnSpan",
  "gridColumnStart",
  "msGridRow",
  "msGridRowSpan",
  "msGridColumn",
  "msGridColumnSpan",
  "fontWeight",
  "lineClamp",
  "lineHeight",
  "opacity",
  "order",
  "orphans",
  "scale",
  "tabSize",
  "widows",
  "zIndex",
  "zoom",
  "WebkitLineClamp",
  "fillOpacity",
  "floodOpacity",
  "stopOpacity",
  "strokeDasharray",
  "strokeDashoffset",
  "strokeMiterlimit",
  "strokeOpacity",
  "strokeWidth",
];

/// Converts a fully static style object into the equivalent css string literal.
///
/// Returns `None` when any property can not be resolved at build time, in which case the object
/// must be left for the runtime to serialize.
pub fn simplify_object(object: &ObjectLit) -> Option<Expr> {
  let css = object_to_css(object)?;

  Some(Expr::Lit(Lit::Str(Str {
    span: object.span,
    value: css.into(),
    raw: None,
  })))
}

fn object_to_css(object: &ObjectLit) -> Option<String> {
  let mut css = String::new();

  for prop in &object.props {
    let PropOrSpread::Prop(prop) = prop else {
      return None;
    };
    let Prop::KeyValue(key_value) = &**prop else {
      return None;
    };

    let key = match &key_value.key {
      PropName::Ident(ident) => ident.sym.to_string(),
      PropName::Str(str) => str.value.to_string(),
      _ => return None,
    };

    // `styles` objects are already serialized
    if key == "styles" {
      return None;
    }

    match &*key_value.value {
      Expr::Object(child) => {
        let child_css = object_to_css(child)?;
        css.push_str(&format!("{}{{{}}}", key, child_css));
      }
      Expr::Lit(Lit::Str(str)) => {
        css.push_str(&format!("{}:{};", process_style_name(&key), str.value));
      }
      Expr::Lit(Lit::Num(num)) => {
        css.push_str(&format!(
          "{}:{};",
          process_style_name(&key),
          process_numeric_value(&key, num.value)?
        ));
      }
      _ => return None,
    }
  }

  Some(css)
}

fn is_custom_property(name: &str) -> bool {
  name.starts_with("--")
}

/// `backgroundColor` → `background-color`, `msTransform` → `-ms-transform`
fn process_style_name(name: &str) -> String {
  if is_custom_property(name) {
    return name.to_string();
  }

  let mut out = String::with_capacity(name.len() + 4);
  if name.starts_with("ms") {
    out.push('-');
  }

  for ch in name.chars() {
    if ch.is_ascii_uppercase() {
      out.push('-');
      out.push(ch.to_ascii_lowercase());
    } else {
      out.push(ch.to_ascii_lowercase());
    }
  }

  out
}

/// Formats a number the way the runtime stringifies it.
///
/// Outside `[1e-6, 1e21)` JavaScript switches to exponent notation, so those values are left for
/// the runtime.
fn format_number(value: f64) -> Option<String> {
  if value == 0.0 {
    return Some("0".to_string());
  }
  if !value.is_finite() || !(1e-6..1e21).contains(&value.abs()) {
    return None;
  }

  Some(format!("{}", value))
}

fn process_numeric_value(name: &str, value: f64) -> Option<String> {
  let number = format_number(value)?;

  if value != 0.0 && !is_custom_property(name) && !UNITLESS_PROPERTIES.contains(&name) {
    Some(format!("{}px", number))
  } else {
    Some(number)
  }
}
