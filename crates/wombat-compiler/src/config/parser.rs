//! Step-file and compiler-config parsing with environment variable
//! substitution.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use wombat_model::Steps;

use crate::config::types::CompilerConfig;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// `$NEX.FEED...` style subjects are left alone: only the braced form is
/// expanded.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();

    let result = ENV_VAR_RE.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            missing.push(var_name.to_string());
            String::new()
        })
    });

    if !missing.is_empty() {
        anyhow::bail!("Missing environment variable(s): {}", missing.join(", "));
    }

    Ok(result.into_owned())
}

/// Parse a step specification from YAML (JSON is accepted too).
///
/// # Errors
///
/// Returns an error if env var substitution fails or the document does not
/// match the step model.
pub fn parse_steps_str(yaml_str: &str) -> Result<Steps> {
    let substituted = substitute_env_vars(yaml_str)?;
    let steps: Steps =
        serde_yaml::from_str(&substituted).context("Failed to parse steps YAML")?;
    Ok(steps)
}

/// Parse a step specification file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn parse_steps(path: &Path) -> Result<Steps> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read steps file: {}", path.display()))?;
    parse_steps_str(&content)
}

/// Parse compiler configuration YAML. Missing fields take their defaults.
///
/// # Errors
///
/// Returns an error if env var substitution fails or the YAML is invalid.
pub fn parse_compiler_config_str(yaml_str: &str) -> Result<CompilerConfig> {
    let substituted = substitute_env_vars(yaml_str)?;
    serde_yaml::from_str(&substituted).context("Failed to parse compiler config YAML")
}

/// Parse a compiler configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn parse_compiler_config(path: &Path) -> Result<CompilerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read compiler config: {}", path.display()))?;
    parse_compiler_config_str(&content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Tests in this module read or write the process environment.
    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn test_env_var_substitution() {
        let _env = env_lock();
        std::env::set_var("WB_TEST_NATS_HOST", "nats.example.com");
        let input = "url: nats://${WB_TEST_NATS_HOST}:4222";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "url: nats://nats.example.com:4222");
        std::env::remove_var("WB_TEST_NATS_HOST");
    }

    #[test]
    fn test_multiple_env_vars() {
        let _env = env_lock();
        std::env::set_var("WB_TEST_A", "alpha");
        std::env::set_var("WB_TEST_B", "beta");
        let result = substitute_env_vars("${WB_TEST_A} and ${WB_TEST_B}").unwrap();
        assert_eq!(result, "alpha and beta");
        std::env::remove_var("WB_TEST_A");
        std::env::remove_var("WB_TEST_B");
    }

    #[test]
    fn test_unbraced_dollar_passthrough() {
        let _env = env_lock();
        let input = "metrics_subject_template: $NEX.FEED.{namespace}.metrics.{instance}";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_multiple_missing_env_vars_all_reported() {
        let _env = env_lock();
        let result = substitute_env_vars("${WB_MISSING_X} and ${WB_MISSING_Y}");
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("WB_MISSING_X"));
        assert!(err_msg.contains("WB_MISSING_Y"));
    }

    #[test]
    fn test_parse_outlet_from_string() {
        let _env = env_lock();
        std::env::set_var("WB_TEST_SINK_URL", "https://example.com/hook");
        let yaml = r#"
consumer:
  nats:
    url: nats://localhost:4222
  stream:
    subject: orders.>
    durable: orders-sink
sink:
  type: http_client
  config:
    url: ${WB_TEST_SINK_URL}
    verb: POST
"#;
        let steps = parse_steps_str(yaml).unwrap();
        let sink = steps.sink.as_ref().unwrap();
        assert_eq!(sink.kind, "http_client");
        assert_eq!(sink.config["url"], "https://example.com/hook");
        assert!(steps.consumer.as_ref().unwrap().stream.is_some());
        std::env::remove_var("WB_TEST_SINK_URL");
    }

    #[test]
    fn test_parse_unknown_format_errors() {
        let _env = env_lock();
        let yaml = r"
source:
  type: stdin
transformer:
  explode:
    format: parquet
producer:
  nats:
    url: nats://localhost:4222
  core:
    subject: foo
";
        let err = parse_steps_str(yaml).unwrap_err();
        assert!(format!("{err:#}").contains("unknown variant"), "got: {err:#}");
    }

    #[test]
    fn test_parse_steps_file_not_found() {
        let _env = env_lock();
        let err = parse_steps(Path::new("/nonexistent/steps.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read steps file"));
    }

    #[test]
    fn test_parse_compiler_config() {
        let _env = env_lock();
        let cfg =
            parse_compiler_config_str("metrics_subject_template: custom.{instance}").unwrap();
        assert_eq!(cfg.metrics_subject("ns", "i"), "custom.i");
    }
}
