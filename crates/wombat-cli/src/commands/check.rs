use std::path::Path;

use anyhow::{Context, Result};
use wombat_compiler::config::parser;
use wombat_compiler::Compiler;
use wombat_model::RuntimeContext;

/// Execute the `check` command: parse, resolve the connector shape and
/// compile, without emitting the document.
pub fn execute(steps_path: &Path) -> Result<()> {
    // 1. Parse steps YAML
    let steps = parser::parse_steps(steps_path)
        .with_context(|| format!("Failed to parse steps: {}", steps_path.display()))?;

    // 2. Resolve the connector shape
    let shape = steps.shape()?;
    println!("{:18} {}", "Connector shape:", shape.label());

    // 3. Compile without runtime identity
    let yaml = Compiler::default()
        .compile(&RuntimeContext::default(), &steps)
        .context("Compilation failed")?;
    println!("{:18} OK ({} bytes)", "Compilation:", yaml.len());

    println!("\nAll checks passed.");
    Ok(())
}
