use atlaspack_emotion_css::{EmotionCssConfig, EmotionCssVisitor};
use swc_core::common::plugin::metadata::TransformPluginMetadataContextKind;
use swc_core::common::sync::Lrc;
use swc_core::ecma::ast::Program;
use swc_core::ecma::visit::VisitMutWith;
use swc_core::plugin::{plugin_transform, proxies::TransformPluginProgramMetadata};

#[plugin_transform]
pub fn process_transform(
  mut program: Program,
  metadata: TransformPluginProgramMetadata,
) -> Program {
  let config = match metadata.get_transform_plugin_config() {
    Some(config_string) => serde_json::from_str::<EmotionCssConfig>(&config_string)
      .expect("Invalid JSON configuration"),
    None => EmotionCssConfig::default(),
  };
  let filename = metadata.get_context(&TransformPluginMetadataContextKind::Filename);

  let mut visitor = EmotionCssVisitor::new(metadata.unresolved_mark, config)
    .with_source_map(Lrc::new(metadata.source_map));

  if let Some(filename) = filename {
    visitor = visitor.with_filename(filename);
  }

  if let Some(comments) = metadata.comments {
    visitor = visitor.with_comments(comments);
  }

  program.visit_mut_with(&mut visitor);

  program
}
