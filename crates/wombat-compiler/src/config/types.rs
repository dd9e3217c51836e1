//! Compiler configuration types.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static SUBJECT_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(namespace|instance)\}").expect("subject placeholder regex is valid")
});

/// Default subject for the metrics exporter, filled per connector instance.
pub const DEFAULT_METRICS_SUBJECT_TEMPLATE: &str = "$NEX.FEED.{namespace}.metrics.{instance}";

/// Knobs that shape the compiled document without being part of a step
/// specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Subject the metrics exporter publishes on. `{namespace}` and
    /// `{instance}` are substituted.
    #[serde(default = "default_metrics_subject_template")]
    pub metrics_subject_template: String,
}

fn default_metrics_subject_template() -> String {
    DEFAULT_METRICS_SUBJECT_TEMPLATE.to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            metrics_subject_template: default_metrics_subject_template(),
        }
    }
}

impl CompilerConfig {
    /// Fill the template in a single pass, so placeholder text inside a
    /// substituted value is left alone.
    pub fn metrics_subject(&self, namespace: &str, instance: &str) -> String {
        SUBJECT_PLACEHOLDER_RE
            .replace_all(&self.metrics_subject_template, |caps: &Captures<'_>| {
                match &caps[1] {
                    "namespace" => namespace,
                    _ => instance,
                }
                .to_string()
            })
            .into_owned()
    }
}
