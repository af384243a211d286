mod arguments;
mod config;
mod env_conditional;
mod guard;
mod hash;
mod label;
mod normalize;
mod object_to_string;
mod purity;
mod serialize;
mod source_map;
mod strings;
mod template;
mod transform;
mod visitor;

pub use arguments::{simplify_arguments, SimplifiedArguments};
pub use config::{EmotionCssConfig, LabelMode};
pub use env_conditional::{branch, dev_only_string};
pub use guard::{CompilationUnitState, STRINGIFIED_CSS_ERROR};
pub use hash::hash;
pub use label::resolve_label;
pub use normalize::normalize_tagged_template;
pub use object_to_string::simplify_object;
pub use purity::is_pure;
pub use serialize::{serialize_styles, StyleIdentity};
pub use source_map::{SourceMapFragmentError, SourceMapFragments};
pub use strings::{append_string_argument, join_string_literals};
pub use template::{expressions_from_template, minify};
pub use transform::{CallSite, StyleTransformer, TransformOutcome};
pub use visitor::EmotionCssVisitor;
