//! Compile outcome telemetry.
//!
//! Instruments are registered on a caller-owned [`Registry`]; there is no
//! process-wide registry. Recording never fails and never touches the
//! compile result.

use std::fmt;
use std::time::Duration;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

const LABELS: &[&str] = &["connector_type", "status"];

#[derive(Clone)]
struct Instruments {
    duration: HistogramVec,
    total: IntCounterVec,
}

/// Records compile duration and success/failure per connector type.
#[derive(Clone, Default)]
pub struct CompileMetrics {
    instruments: Option<Instruments>,
}

impl fmt::Debug for CompileMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileMetrics")
            .field("enabled", &self.instruments.is_some())
            .finish()
    }
}

impl CompileMetrics {
    /// Create the compile instruments and register them on `registry`.
    ///
    /// # Errors
    ///
    /// Fails if the metric names are already registered on `registry`.
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "wombat_compile_duration_seconds",
                "Time spent compiling a step specification",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
            LABELS,
        )?;
        registry.register(Box::new(duration.clone()))?;

        let total = IntCounterVec::new(
            Opts::new("wombat_compile_total", "Number of compile calls by outcome"),
            LABELS,
        )?;
        registry.register(Box::new(total.clone()))?;

        Ok(Self {
            instruments: Some(Instruments { duration, total }),
        })
    }

    /// Metrics that record nothing.
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn record(&self, connector_type: &str, success: bool, elapsed: Duration) {
        let Some(instruments) = &self.instruments else {
            return;
        };
        let status = if success { "success" } else { "failure" };
        instruments
            .duration
            .with_label_values(&[connector_type, status])
            .observe(elapsed.as_secs_f64());
        instruments
            .total
            .with_label_values(&[connector_type, status])
            .inc();
    }
}
