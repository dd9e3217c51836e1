use std::path::Path;

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};
use wombat_compiler::config::parser;
use wombat_compiler::{CompileMetrics, Compiler, CompilerConfig};
use wombat_model::RuntimeContext;

/// Execute the `compile` command: parse the steps file, compile it and emit
/// the runtime configuration.
///
/// Compile telemetry is logged at debug level and, with `metrics_out`,
/// written in Prometheus text format whether or not compilation succeeded.
pub fn execute(
    steps_path: &Path,
    runtime: &RuntimeContext,
    config_path: Option<&Path>,
    output: Option<&Path>,
    metrics_out: Option<&Path>,
) -> Result<()> {
    let registry = Registry::new();
    let rendered = render(steps_path, runtime, config_path, &registry);

    let exposition = encode_metrics(&registry)?;
    tracing::debug!(metrics = %exposition, "Compile telemetry");
    if let Some(path) = metrics_out {
        std::fs::write(path, &exposition)
            .with_context(|| format!("Failed to write metrics: {}", path.display()))?;
    }

    let yaml = rendered?;

    match output {
        Some(path) => {
            std::fs::write(path, &yaml)
                .with_context(|| format!("Failed to write configuration: {}", path.display()))?;
            tracing::info!(path = %path.display(), "Configuration written");
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

pub(crate) fn render(
    steps_path: &Path,
    runtime: &RuntimeContext,
    config_path: Option<&Path>,
    registry: &Registry,
) -> Result<String> {
    let config = match config_path {
        Some(path) => parser::parse_compiler_config(path)?,
        None => CompilerConfig::default(),
    };

    let missing = runtime.missing_metrics_fields();
    if !missing.is_empty() {
        tracing::warn!(
            "Could not retrieve config required for metrics, missing: {}",
            missing.join(", ")
        );
    }

    let steps = parser::parse_steps(steps_path)
        .with_context(|| format!("Failed to parse steps: {}", steps_path.display()))?;

    let metrics = CompileMetrics::register(registry)?;
    let compiler = Compiler::new(config, metrics);

    compiler
        .compile(runtime, &steps)
        .with_context(|| format!("Failed to compile steps: {}", steps_path.display()))
}

/// Encode every metric family in `registry` to Prometheus text format.
pub(crate) fn encode_metrics(registry: &Registry) -> Result<String> {
    let mut buffer = vec![];
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
