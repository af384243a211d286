use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sourcemap::SourceMapBuilder;
use swc_core::common::sync::Lrc;
use swc_core::common::{BytePos, SourceMapper};

#[derive(Debug, thiserror::Error)]
pub enum SourceMapFragmentError {
  #[error("Failed to serialize source map: {0}")]
  Serialize(#[from] sourcemap::Error),
}

/// Produces inline source map comments pointing generated styles back at their call site.
pub struct SourceMapFragments {
  source_map: Lrc<dyn SourceMapper>,
  filename: String,
}

impl SourceMapFragments {
  pub fn new(source_map: Lrc<dyn SourceMapper>, filename: String) -> Self {
    SourceMapFragments {
      source_map,
      filename,
    }
  }

  /// Returns a `/*# sourceMappingURL=... */` comment mapping the start of the styles to `pos`.
  ///
  /// Failures are logged and produce no fragment.
  pub fn fragment(&self, pos: BytePos) -> Option<String> {
    if pos.is_dummy() {
      return None;
    }

    match self.build(pos) {
      Ok(fragment) => Some(fragment),
      Err(error) => {
        tracing::warn!(%error, filename = %self.filename, "Skipping style source map");
        None
      }
    }
  }

  fn build(&self, pos: BytePos) -> Result<String, SourceMapFragmentError> {
    let loc = self.source_map.lookup_char_pos(pos);

    let mut builder = SourceMapBuilder::new(Some(&self.filename));
    let source_id = builder.add_source(&self.filename);
    builder.set_source_contents(source_id, Some(loc.file.src.as_str()));
    builder.add_raw(
      0,
      0,
      loc.line.saturating_sub(1) as u32,
      loc.col.0 as u32,
      Some(source_id),
      None,
      false,
    );

    let mut buffer = Vec::new();
    builder.into_sourcemap().to_writer(&mut buffer)?;

    Ok(format!(
      "/*# sourceMappingURL=data:application/json;charset=utf-8;base64,{} */",
      BASE64.encode(buffer)
    ))
  }
}
