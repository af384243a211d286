use std::path::PathBuf;
use std::string::FromUtf8Error;

use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::input::StringInput;
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, Globals, Mark, SourceMap, GLOBALS};
use swc_core::ecma::ast::{EsVersion, Module};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{Parser, Syntax};
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

pub struct RunContext {
  /// Source-map in use
  pub source_map: Lrc<SourceMap>,
  /// Comments collected while parsing, emitted with the output
  pub comments: SingleThreadedComments,
  /// Global mark from SWC resolver
  pub global_mark: Mark,
  /// Unresolved mark from SWC resolver
  pub unresolved_mark: Mark,
  /// Name the code was parsed under, if any
  pub filename: Option<String>,
}

pub struct RunVisitResult<V> {
  pub output_code: String,
  #[allow(unused)]
  pub visitor: V,
}

pub struct RunWithTransformationOptions<'a> {
  pub code: &'a str,
  /// Parsed as an anonymous file when `None`
  pub filename: Option<&'a str>,
  /// Defaults to ES with JSX enabled
  pub syntax: Option<Syntax>,
}

impl<'a> From<&'a str> for RunWithTransformationOptions<'a> {
  fn from(code: &'a str) -> Self {
    RunWithTransformationOptions {
      code,
      filename: None,
      syntax: None,
    }
  }
}

/// Runner of SWC transformations
///
/// * Parse `code` with SWC
/// * Run a visitor over it
/// * Return the result
///
pub fn run_visit<'a, V: VisitMut>(
  options: impl Into<RunWithTransformationOptions<'a>>,
  make_visit: impl FnOnce(RunContext) -> V,
) -> Result<RunVisitResult<V>, RunWithTransformationError> {
  let (output_code, visitor) = run_with_transformation(
    options.into(),
    |run_test_context: RunContext, module: &mut Module| {
      let mut visit = make_visit(run_test_context);
      module.visit_mut_with(&mut visit);
      visit
    },
  )?;
  Ok(RunVisitResult {
    output_code,
    visitor,
  })
}

/// Same as `run_visit` but for `Visit` instead of `VisitMut`
pub fn run_visit_const<'a, V: Visit>(
  options: impl Into<RunWithTransformationOptions<'a>>,
  make_visit: impl FnOnce(RunContext) -> V,
) -> Result<RunVisitResult<V>, RunWithTransformationError> {
  let (output_code, visitor) = run_with_transformation(
    options.into(),
    |run_test_context: RunContext, module: &mut Module| {
      let mut visit = make_visit(run_test_context);
      module.visit_with(&mut visit);
      visit
    },
  )?;
  Ok(RunVisitResult {
    output_code,
    visitor,
  })
}

#[derive(Debug, thiserror::Error)]
pub enum RunWithTransformationError {
  #[error("Failed to parse module")]
  SwcParse(swc_core::ecma::parser::error::Error),
  #[error("IO Error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Invalid utf-8 output: {0}")]
  InvalidUtf8Output(#[from] FromUtf8Error),
}

/// Parse code, run resolver over it, then run the `transform` function with the parsed module.
/// Codegen the module, including any comments attached during the transform, and return it.
pub fn run_with_transformation<R>(
  options: RunWithTransformationOptions<'_>,
  transform: impl FnOnce(RunContext, &mut Module) -> R,
) -> Result<(String, R), RunWithTransformationError> {
  let source_map = Lrc::new(SourceMap::default());
  let file_name = match options.filename {
    Some(filename) => FileName::Real(PathBuf::from(filename)),
    None => FileName::Anon,
  };
  let source_file = source_map.new_source_file(Lrc::new(file_name), options.code.to_string());
  let comments = SingleThreadedComments::default();

  let syntax = options.syntax.unwrap_or_else(|| {
    Syntax::Es(swc_core::ecma::parser::EsSyntax {
      jsx: true,
      ..Default::default()
    })
  });

  let lexer = Lexer::new(
    syntax,
    EsVersion::latest(),
    StringInput::from(&*source_file),
    Some(&comments),
  );

  let mut parser = Parser::new_from(lexer);
  let mut module = parser
    .parse_module()
    .map_err(RunWithTransformationError::SwcParse)?;

  GLOBALS.set(
    &Globals::new(),
    || -> Result<(String, R), RunWithTransformationError> {
      let global_mark = Mark::new();
      let unresolved_mark = Mark::new();
      module.visit_mut_with(&mut resolver(unresolved_mark, global_mark, false));

      let context = RunContext {
        source_map: source_map.clone(),
        comments: comments.clone(),
        global_mark,
        unresolved_mark,
        filename: options.filename.map(String::from),
      };
      let result = transform(context, &mut module);

      let mut output_buffer = vec![];
      let writer = JsWriter::new(source_map.clone(), "\n", &mut output_buffer, None);
      let mut emitter = swc_core::ecma::codegen::Emitter {
        cfg: Default::default(),
        cm: source_map.clone(),
        comments: Some(&comments),
        wr: writer,
      };
      emitter.emit_module(&module)?;
      let output_code = String::from_utf8(output_buffer)?;

      Ok((output_code, result))
    },
  )
}
