//! Transformer compilation: turns a (possibly nested) transformer step into
//! processor fragments.

use wombat_model::{
    CombineTransformer, ExplodeFormat, ExplodeTransformer, ServiceTransformer, TransformerKind,
    TransformerStep,
};

use crate::connection::{compile_connection, include_all_metadata};
use crate::errors::{CompileError, CompilePhase};
use crate::fragment::Fragment;

const ROOT_STEP: &str = "transformer";

/// Compile an optional transformer into a single processor fragment.
///
/// Returns `Ok(None)` only when no transformer is given. A composite always
/// compiles to its `processors.sequence` wrapper, even with no children.
///
/// # Errors
///
/// Returns a validation error naming the offending node when a step (at any
/// depth) does not set exactly one variant.
pub fn compile_transformer(
    step: Option<&TransformerStep>,
) -> Result<Option<Fragment>, CompileError> {
    step.map(|step| compile_node(step, ROOT_STEP)).transpose()
}

/// Attach the compiled transformer to `section` as a one-element
/// `processors` list. Leaves `section` untouched when there is nothing to
/// attach.
pub(crate) fn attach_processors(
    section: Fragment,
    transformer: Option<&TransformerStep>,
) -> Result<Fragment, CompileError> {
    let compiled =
        compile_transformer(transformer).map_err(|e| e.in_phase(CompilePhase::Transformer))?;
    Ok(match compiled {
        Some(processor) => section.fragments("processors", [processor]),
        None => section,
    })
}

fn compile_node(step: &TransformerStep, path: &str) -> Result<Fragment, CompileError> {
    Ok(match step.kind(path)? {
        TransformerKind::Service(service) => compile_service(service),
        TransformerKind::Mapping(mapping) => {
            Fragment::new().scalar("mapping", mapping.source_code.as_str())
        }
        TransformerKind::Explode(explode) => compile_explode(explode),
        TransformerKind::Combine(combine) => compile_combine(combine),
        TransformerKind::Composite(composite) => {
            let children = composite
                .sequential
                .iter()
                .enumerate()
                .map(|(i, child)| compile_node(child, &format!("{path}.composite.sequential[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Fragment::new().fragment("processors", Fragment::new().fragments("sequence", children))
        }
    })
}

fn compile_service(service: &ServiceTransformer) -> Fragment {
    let request_reply = compile_connection(&service.nats)
        .scalar("subject", service.endpoint.as_str())
        .opt_scalar("timeout", service.timeout.as_deref())
        .fragment("metadata", include_all_metadata());
    Fragment::new().fragment("nats_request_reply", request_reply)
}

fn compile_explode(explode: &ExplodeTransformer) -> Fragment {
    let delimiter = explode.delimiter.as_deref().filter(|d| {
        explode.format.is_delimited() && !d.is_empty() && *d != ExplodeFormat::DEFAULT_DELIMITER
    });
    Fragment::new().fragment(
        "unarchive",
        Fragment::new()
            .scalar("format", explode.format.as_str())
            .opt_scalar("delimiter", delimiter),
    )
}

fn compile_combine(combine: &CombineTransformer) -> Fragment {
    let path = combine
        .path
        .as_deref()
        .filter(|p| combine.format.takes_path() && !p.is_empty());
    Fragment::new().fragment(
        "archive",
        Fragment::new()
            .scalar("format", combine.format.as_str())
            .opt_scalar("path", path),
    )
}
