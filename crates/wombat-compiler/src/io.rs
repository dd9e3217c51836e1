//! Source and sink passthrough.
//!
//! The step type becomes the component key and the config map is embedded
//! untouched. Inlet transformers hang off the source; sinks never carry
//! processors because outlet transformers run on the consumer.

use wombat_model::{SinkStep, SourceStep, TransformerStep};

use crate::errors::CompileError;
use crate::fragment::Fragment;
use crate::transformer::attach_processors;

/// # Errors
///
/// Returns a transformer-phase error when `transformer` is invalid.
pub fn compile_source(
    step: &SourceStep,
    transformer: Option<&TransformerStep>,
) -> Result<Fragment, CompileError> {
    let input = Fragment::new().map(&step.kind, step.config.clone());
    attach_processors(input, transformer)
}

pub fn compile_sink(step: &SinkStep) -> Fragment {
    Fragment::new().map(&step.kind, step.config.clone())
}
