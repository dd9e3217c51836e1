//! Producer compilation: the `output` section of an inlet.

use wombat_model::{ProducerKind, ProducerStep};

use crate::connection::{compile_connection, include_all_metadata};
use crate::errors::CompileError;
use crate::fragment::Fragment;

const DEFAULT_MAX_IN_FLIGHT: u32 = 1;

/// Compile a producer into a `nats`, `nats_jetstream` or `nats_kv` output.
///
/// # Errors
///
/// Returns a validation error unless exactly one of core, stream and kv is
/// set.
pub fn compile_producer(step: &ProducerStep) -> Result<Fragment, CompileError> {
    let max_in_flight = step
        .threads
        .filter(|t| *t > 0)
        .unwrap_or(DEFAULT_MAX_IN_FLIGHT);
    let connection = compile_connection(&step.nats);

    let output = match step.kind()? {
        ProducerKind::Core(core) => Fragment::new().fragment(
            "nats",
            connection
                .scalar("subject", core.subject.as_str())
                .scalar("max_in_flight", max_in_flight)
                .fragment("metadata", include_all_metadata()),
        ),
        // Delivery and ack settings only exist on the consuming side.
        ProducerKind::Stream(stream) => Fragment::new().fragment(
            "nats_jetstream",
            connection
                .scalar("subject", stream.subject.as_str())
                .scalar("max_in_flight", max_in_flight)
                .fragment("metadata", include_all_metadata()),
        ),
        ProducerKind::Kv(kv) => Fragment::new().fragment(
            "nats_kv",
            connection
                .scalar("bucket", kv.bucket.as_str())
                .scalar("key", kv.key.as_str())
                .scalar("max_in_flight", max_in_flight),
        ),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wombat_model::{NatsConfig, ValidationError};

    const URL: &str = "nats://localhost:4222";

    fn step() -> ProducerStep {
        ProducerStep::new(NatsConfig::new(URL))
    }

    #[test]
    fn errors_without_producer_type() {
        let err = compile_producer(&step()).unwrap_err();
        assert_eq!(
            err.root_validation(),
            Some(&ValidationError::ProducerType { found: 0 })
        );
    }

    #[test]
    fn errors_with_multiple_producer_types() {
        let err = compile_producer(&step().core("foo").kv("foo", "bar")).unwrap_err();
        assert!(err.to_string().contains("exactly one producer type"));
    }

    #[test]
    fn renders_core_producer() {
        let frag = compile_producer(&step().core("foo.bar")).unwrap();
        assert!(frag.equals_map(&json!({
            "nats": {
                "urls": [URL],
                "subject": "foo.bar",
                "max_in_flight": 1,
                "metadata": {"include_patterns": [".*"]},
            }
        })));
    }

    #[test]
    fn renders_stream_producer_with_threads() {
        let frag = compile_producer(&step().stream("foo").threads(8)).unwrap();
        assert!(frag.equals_map(&json!({
            "nats_jetstream": {
                "urls": [URL],
                "subject": "foo",
                "max_in_flight": 8,
                "metadata": {"include_patterns": [".*"]},
            }
        })));
    }

    #[test]
    fn renders_kv_producer() {
        let frag = compile_producer(&step().kv("foo", "bar")).unwrap();
        assert!(frag.equals_map(&json!({
            "nats_kv": {
                "urls": [URL],
                "bucket": "foo",
                "key": "bar",
                "max_in_flight": 1,
            }
        })));
    }

    #[test]
    fn zero_threads_falls_back_to_default() {
        let frag = compile_producer(&step().core("foo").threads(0)).unwrap();
        assert_eq!(frag.get("nats").unwrap()["max_in_flight"], 1);
    }

    #[test]
    fn authenticated_producer_nests_auth() {
        let nats = NatsConfig::new(URL).with_auth(Some("jwt"), None);
        let frag = compile_producer(&ProducerStep::new(nats).core("foo")).unwrap();
        assert_eq!(frag.get("nats").unwrap()["auth"], json!({"user_jwt": "jwt"}));
    }
}
