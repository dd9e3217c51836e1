//! Step specification to stream runtime configuration compiler.
//!
//! [`Compiler`] takes a connector's [`Steps`](wombat_model::Steps) and
//! produces the YAML document the stream runtime loads: an `input`, an
//! `output` and, when the runtime identity allows it, a `metrics` exporter
//! block. Compilation is synchronous and pure apart from telemetry.

pub mod compiler;
pub mod config;
pub mod connection;
pub mod consumer;
pub mod errors;
pub mod fragment;
pub mod io;
pub mod metrics;
pub mod producer;
pub mod transformer;

pub use compiler::{compile, Compiler};
pub use config::types::CompilerConfig;
pub use errors::{CompileError, CompilePhase};
pub use fragment::Fragment;
pub use metrics::CompileMetrics;
