//! Consumer compilation: the `input` section of an outlet.

use wombat_model::{ConsumerKind, ConsumerStep, TransformerStep};

use crate::connection::compile_connection;
use crate::errors::CompileError;
use crate::fragment::Fragment;
use crate::transformer::attach_processors;

const DEFAULT_MAX_ACK_PENDING: u32 = 1;

/// Compile a consumer into a `nats`, `nats_jetstream` or `nats_kv` input,
/// attaching `transformer` as its processor chain.
///
/// `step.threads` is ignored: consumer inputs carry no `max_in_flight`.
///
/// # Errors
///
/// Returns a validation error unless exactly one of core, stream and kv is
/// set, or a transformer-phase error when the transformer is invalid.
pub fn compile_consumer(
    step: &ConsumerStep,
    transformer: Option<&TransformerStep>,
) -> Result<Fragment, CompileError> {
    let connection = compile_connection(&step.nats);

    let input = match step.kind()? {
        ConsumerKind::Core(core) => Fragment::new().fragment(
            "nats",
            connection
                .scalar("subject", core.subject.as_str())
                .opt_scalar("queue", core.queue.as_deref()),
        ),
        ConsumerKind::Stream(stream) => Fragment::new().fragment(
            "nats_jetstream",
            connection
                .scalar("subject", stream.subject.as_str())
                .scalar("deliver", stream.deliver_policy.unwrap_or_default().as_str())
                .scalar("bind", stream.bind.unwrap_or(false))
                .opt_scalar("ack_wait", stream.ack_wait.as_deref())
                .opt_scalar("durable", stream.durable.as_deref())
                .scalar(
                    "max_ack_pending",
                    stream.max_ack_pending.unwrap_or(DEFAULT_MAX_ACK_PENDING),
                )
                .opt_scalar("queue", stream.queue.as_deref()),
        ),
        ConsumerKind::Kv(kv) => Fragment::new().fragment(
            "nats_kv",
            connection
                .scalar("bucket", kv.bucket.as_str())
                .scalar("key", kv.key.as_str()),
        ),
    };

    attach_processors(input, transformer)
}
