use std::iter::Peekable;
use std::str::Chars;

use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::ecma::ast::{Expr, Tpl};

use crate::strings::string_literal;

const PLACEHOLDER_START: char = '\u{E000}';
const PLACEHOLDER_END: char = '\u{E001}';

static PLACEHOLDER_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());

/// Splits a css template literal into its minified text segments and interpolated expressions,
/// in source order.
///
/// Empty text segments are dropped. A template without interpolations always yields exactly one
/// string literal.
pub fn expressions_from_template(tpl: &Tpl) -> Vec<Box<Expr>> {
  let mut source = String::new();

  for (index, quasi) in tpl.quasis.iter().enumerate() {
    source.push_str(quasi.cooked.as_ref().unwrap_or(&quasi.raw));
    if index < tpl.exprs.len() {
      source.push(PLACEHOLDER_START);
      source.push_str(&index.to_string());
      source.push(PLACEHOLDER_END);
    }
  }

  let css = minify(&source);

  if tpl.exprs.is_empty() {
    return vec![Box::new(string_literal(&css))];
  }

  let mut expressions = Vec::with_capacity(tpl.exprs.len() * 2 + 1);
  let mut cursor = 0;

  for captures in PLACEHOLDER_PATTERN.captures_iter(&css) {
    let (Some(placeholder), Some(expr)) = (
      captures.get(0),
      captures[1]
        .parse::<usize>()
        .ok()
        .and_then(|index| tpl.exprs.get(index)),
    ) else {
      continue;
    };

    let text = &css[cursor..placeholder.start()];
    if !text.is_empty() {
      expressions.push(Box::new(string_literal(text)));
    }
    expressions.push(expr.clone());

    cursor = placeholder.end();
  }

  let rest = &css[cursor..];
  if !rest.is_empty() {
    expressions.push(Box::new(string_literal(rest)));
  }

  expressions
}

fn is_separator(ch: char) -> bool {
  matches!(ch, ';' | '{' | '}' | ',')
}

/// Skips a `/* */` or `//` comment, keeping any interpolation placeholder written inside it.
///
/// A line comment stops before its newline so the caller still sees the whitespace.
fn skip_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String, line: bool) {
  let mut previous = '\0';
  let mut placeholder: Option<String> = None;

  while let Some(&next) = chars.peek() {
    if line && next == '\n' {
      break;
    }
    chars.next();
    if !line && previous == '*' && next == '/' {
      break;
    }
    previous = next;

    if next == PLACEHOLDER_START {
      placeholder = Some(String::new());
    }
    if let Some(buffer) = placeholder.as_mut() {
      buffer.push(next);
    }
    if next == PLACEHOLDER_END {
      if let Some(buffer) = placeholder.take() {
        out.push_str(&buffer);
      }
    }
  }
}

/// Drops comments and any whitespace that does not change the meaning of the css.
///
/// Whitespace before `:` is kept since it is significant in selectors such as `& :hover`. The
/// contents of `url(...)` are copied verbatim, so `//` inside a url is not a comment.
pub fn minify(css: &str) -> String {
  let mut out = String::with_capacity(css.len());
  let mut chars = css.chars().peekable();
  let mut quote: Option<char> = None;

  while let Some(ch) = chars.next() {
    if let Some(open) = quote {
      out.push(ch);
      if ch == '\\' {
        if let Some(escaped) = chars.next() {
          out.push(escaped);
        }
      } else if ch == open {
        quote = None;
      }
      continue;
    }

    match ch {
      '"' | '\'' => {
        quote = Some(ch);
        out.push(ch);
      }
      '(' if out.ends_with("url") => {
        out.push(ch);
        for next in chars.by_ref() {
          out.push(next);
          if next == ')' {
            break;
          }
        }
      }
      '/' if chars.peek() == Some(&'*') => {
        chars.next();
        skip_comment(&mut chars, &mut out, false);
      }
      '/' if chars.peek() == Some(&'/') => {
        chars.next();
        skip_comment(&mut chars, &mut out, true);
      }
      ch if ch.is_whitespace() => {
        while chars.peek().is_some_and(|next| next.is_whitespace()) {
          chars.next();
        }

        let after_separator = out
          .chars()
          .next_back()
          .map_or(true, |last| is_separator(last) || last == ':');
        let before_separator = chars.peek().map_or(true, |next| is_separator(*next));

        if !after_separator && !before_separator {
          out.push(' ');
        }
      }
      _ => out.push(ch),
    }
  }

  out
}

#[cfg(test)]
mod tests {
  use atlaspack_swc_runner::test_utils::run_test_visit_const;
  use swc_core::ecma::ast::{Lit, TaggedTpl};
  use swc_core::ecma::visit::Visit;

  use super::*;

  #[derive(Default)]
  struct FirstTemplate(Option<Tpl>);

  impl Visit for FirstTemplate {
    fn visit_tagged_tpl(&mut self, tagged: &TaggedTpl) {
      if self.0.is_none() {
        self.0 = Some((*tagged.tpl).clone());
      }
    }
  }

  fn extract(code: &str) -> Vec<String> {
    let tpl = run_test_visit_const(code, |_| FirstTemplate::default())
      .visitor
      .0
      .unwrap();

    expressions_from_template(&tpl)
      .iter()
      .map(|expr| match &**expr {
        Expr::Lit(Lit::Str(str)) => format!("{:?}", &*str.value),
        Expr::Ident(ident) => ident.sym.to_string(),
        _ => "<expr>".into(),
      })
      .collect()
  }

  #[test]
  fn test_static_template() {
    assert_eq!(
      extract("css`\n  color: red;\n  display: block;\n`;"),
      vec!["\"color:red;display:block;\""]
    );
  }

  #[test]
  fn test_empty_template() {
    assert_eq!(extract("css``;"), vec!["\"\""]);
  }

  #[test]
  fn test_interpolations_keep_source_order() {
    assert_eq!(
      extract("css`\n  color: ${color};\n  margin: ${a} ${b};\n`;"),
      vec![
        "\"color:\"",
        "color",
        "\";margin:\"",
        "a",
        "\" \"",
        "b",
        "\";\""
      ]
    );
  }

  #[test]
  fn test_leading_and_trailing_interpolations() {
    assert_eq!(
      extract("css`${base} color: red; ${extra}`;"),
      vec!["base", "\" color:red;\"", "extra"]
    );
  }

  #[test]
  fn test_interpolation_inside_comment_is_kept() {
    assert_eq!(
      minify("color: red; /* \u{E000}0\u{E001} */ display: block;"),
      "color:red;\u{E000}0\u{E001} display:block;"
    );
    assert_eq!(
      extract("css`color: red; /* ${sideEffect()} */`;"),
      vec!["\"color:red;\"", "<expr>"]
    );
  }

  #[test]
  fn test_line_comments() {
    assert_eq!(
      minify("\n  color: red; // don't\n  display:   block;\n"),
      "color:red;display:block;"
    );
    assert_eq!(
      minify("color: red; // \u{E000}0\u{E001}\n"),
      "color:red;\u{E000}0\u{E001}"
    );
  }

  #[test]
  fn test_urls_are_copied_verbatim() {
    assert_eq!(
      minify("background: url(//example.com/a.png);  color: red;"),
      "background:url(//example.com/a.png);color:red;"
    );
  }

  #[test]
  fn test_minify() {
    assert_eq!(
      minify("  & :hover , a > b {\n  color : red; /* note */\n  content: '  x  ';\n}  "),
      "& :hover,a > b{color :red;content:'  x  ';}"
    );
  }
}
