//! Compile orchestrator: step specification in, runtime YAML out.

use std::time::Instant;

use wombat_model::{ConnectorShape, RuntimeContext, Steps};

use crate::config::types::CompilerConfig;
use crate::consumer::compile_consumer;
use crate::errors::{CompileError, CompilePhase};
use crate::fragment::Fragment;
use crate::io::{compile_sink, compile_source};
use crate::metrics::CompileMetrics;
use crate::producer::compile_producer;

pub const ACCOUNT_METRIC_HEADER: &str = "account";
pub const CONNECTOR_METRIC_HEADER: &str = "connector_id";
pub const INSTANCE_METRIC_HEADER: &str = "instance_id";

const UNKNOWN_CONNECTOR: &str = "unknown";

/// Compiles step specifications into stream runtime configuration.
///
/// Holds no per-call state: a single `Compiler` can be shared across
/// threads and used for independent inputs concurrently.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
    metrics: CompileMetrics,
}

impl Compiler {
    pub fn new(config: CompilerConfig, metrics: CompileMetrics) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `steps` to YAML.
    ///
    /// Duration and outcome are recorded on the compile metrics whatever
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns the first validation or compilation failure; no partial
    /// document is produced.
    pub fn compile(&self, runtime: &RuntimeContext, steps: &Steps) -> Result<String, CompileError> {
        let start = Instant::now();
        let connector_type = steps.shape().map_or(UNKNOWN_CONNECTOR, |s| s.label());

        let span = tracing::debug_span!(
            "compile",
            namespace = %runtime.namespace,
            instance = %runtime.instance,
            connector = %runtime.connector,
            connector_type,
        );
        let _enter = span.enter();

        let result = self.compile_document(runtime, steps).and_then(|document| {
            tracing::debug!("Marshaling configuration to YAML");
            serde_yaml::to_string(&document)
                .map_err(|e| CompileError::from(e).in_phase(CompilePhase::Marshal))
        });

        self.metrics
            .record(connector_type, result.is_ok(), start.elapsed());

        match &result {
            Ok(yaml) => {
                tracing::debug!(config_length = yaml.len(), "Compilation completed successfully");
            }
            Err(err) => tracing::error!(error = %err, "Compilation failed"),
        }
        result
    }

    /// Build the document tree without serializing it.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile`], minus serialization failures.
    pub fn compile_document(
        &self,
        runtime: &RuntimeContext,
        steps: &Steps,
    ) -> Result<Fragment, CompileError> {
        let shape = steps.shape()?;
        let metrics = self.metrics_fragment(runtime);

        let (input, output) = match shape {
            ConnectorShape::Inlet { source, producer } => {
                tracing::debug!("Compiling inlet connector (source -> producer)");
                let output =
                    compile_producer(producer).map_err(|e| e.in_phase(CompilePhase::Producer))?;
                (compile_source(source, steps.transformer.as_ref())?, output)
            }
            ConnectorShape::Outlet { consumer, sink } => {
                tracing::debug!("Compiling outlet connector (consumer -> sink)");
                let input = compile_consumer(consumer, steps.transformer.as_ref())
                    .map_err(|e| e.in_phase(CompilePhase::Consumer))?;
                (input, compile_sink(sink))
            }
        };

        let document = Fragment::new()
            .fragment("input", input)
            .fragment("output", output);
        Ok(match metrics {
            Some(metrics) => document.fragment("metrics", metrics),
            None => document,
        })
    }

    /// The `metrics` block, present only when url, namespace and instance
    /// are all set.
    fn metrics_fragment(&self, runtime: &RuntimeContext) -> Option<Fragment> {
        let missing = runtime.missing_metrics_fields();
        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "Skipping NATS metrics configuration");
            return None;
        }

        let subject = self
            .config
            .metrics_subject(&runtime.namespace, &runtime.instance);
        tracing::debug!(nats_url = %runtime.nats_url, metrics_subject = %subject, "Configuring NATS metrics");

        let mut nats = Fragment::new()
            .scalar("url", runtime.nats_url.as_str())
            .scalar("subject", subject)
            .string_map(
                "headers",
                [
                    (ACCOUNT_METRIC_HEADER, runtime.namespace.as_str()),
                    (CONNECTOR_METRIC_HEADER, runtime.connector.as_str()),
                    (INSTANCE_METRIC_HEADER, runtime.instance.as_str()),
                ],
            );
        if let Some((jwt, seed)) = runtime.credentials() {
            tracing::debug!("Adding NATS JWT authentication");
            nats = nats.scalar("jwt", jwt).scalar("seed", seed);
        }

        Some(Fragment::new().fragment("nats", nats))
    }
}

/// Compile with default configuration and no telemetry.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile(runtime: &RuntimeContext, steps: &Steps) -> Result<String, CompileError> {
    Compiler::default().compile(runtime, steps)
}
