//! Integration tests for step-file parsing and compilation.
//!
//! Fixtures live in `tests/fixtures/steps` at the workspace root. The
//! compiled YAML is read back and inspected the way the stream runtime
//! would see it.

use std::path::PathBuf;

use serde_yaml::Value;
use wombat_compiler::config::parser;
use wombat_compiler::{compile, CompileError, CompilePhase};
use wombat_model::{RuntimeContext, ValidationError};

fn fixture(name: &str) -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures/steps")
        .join(name)
}

fn path<'a>(doc: &'a Value, dotted: &str) -> &'a Value {
    dotted.split('.').fold(doc, |node, segment| match segment.parse::<usize>() {
        Ok(i) => &node[i],
        Err(_) => &node[segment],
    })
}

fn runtime() -> RuntimeContext {
    RuntimeContext::new("acme", "conn-1", "inst-1").with_nats_url("nats://localhost:4222")
}

/// Inlet with a service transformer attached to the source.
#[test]
fn test_compile_inlet_service_fixture() {
    let steps = parser::parse_steps(&fixture("inlet_service.yaml")).expect("fixture must parse");

    let yaml = compile(&runtime(), &steps).expect("inlet must compile");
    let doc: Value = serde_yaml::from_str(&yaml).expect("output must be valid YAML");

    assert_eq!(path(&doc, "input.stdin.codec"), "lines");
    assert_eq!(
        path(&doc, "input.processors.0.nats_request_reply.urls.0"),
        "nats://localhost:4222"
    );
    assert_eq!(
        path(&doc, "input.processors.0.nats_request_reply.subject"),
        "my.service"
    );
    assert_eq!(path(&doc, "input.processors.0.nats_request_reply.timeout"), "5s");
    assert_eq!(
        path(&doc, "input.processors.0.nats_request_reply.metadata.include_patterns.0"),
        ".*"
    );

    assert_eq!(path(&doc, "output.nats.subject"), "foo.bar");
    assert_eq!(path(&doc, "output.nats.max_in_flight").as_u64(), Some(1));
    assert_eq!(path(&doc, "output.nats.metadata.include_patterns.0"), ".*");
    assert!(path(&doc, "output.processors").is_null());

    assert_eq!(
        path(&doc, "metrics.nats.subject"),
        "$NEX.FEED.acme.metrics.inst-1"
    );
    assert_eq!(path(&doc, "metrics.nats.headers.connector_id"), "conn-1");
}

/// Outlet: transformer chain on the consumer, sink untouched.
#[test]
fn test_compile_outlet_stream_fixture() {
    let steps = parser::parse_steps(&fixture("outlet_stream.yaml")).expect("fixture must parse");
    let yaml = compile(&RuntimeContext::default(), &steps).expect("outlet must compile");
    let doc: Value = serde_yaml::from_str(&yaml).unwrap();

    let js = path(&doc, "input.nats_jetstream");
    assert_eq!(js["subject"], "orders.>");
    assert_eq!(js["deliver"], "all");
    assert_eq!(js["bind"], false);
    assert_eq!(js["ack_wait"], "30s");
    assert_eq!(js["durable"], "orders-sink");
    assert_eq!(js["max_ack_pending"], 1);
    assert!(js["auth"]["user_jwt"].is_string());
    assert!(js["auth"]["user_nkey_seed"].is_null());
    assert!(js["user_jwt"].is_null());

    let seq = path(&doc, "input.processors.0.processors.sequence");
    assert_eq!(seq[0]["unarchive"]["format"], "csv");
    assert_eq!(seq[0]["unarchive"]["delimiter"], "\t");
    assert_eq!(seq[1]["mapping"], "root = this.uppercase()");
    assert_eq!(seq[2]["archive"]["format"], "zip");
    assert_eq!(seq[2]["archive"]["path"], "batch.zip");

    assert_eq!(path(&doc, "output.http_client.verb"), "POST");
    assert_eq!(
        path(&doc, "output.http_client.headers.Content-Type"),
        "application/json"
    );
    assert!(path(&doc, "output.processors").is_null());
    assert!(path(&doc, "metrics").is_null());
}

#[test]
fn test_invalid_shape_fixture_fails_validation() {
    let steps = parser::parse_steps(&fixture("invalid_steps.yaml")).expect("fixture must parse");
    let err = compile(&runtime(), &steps).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Validation(ValidationError::InvalidSteps)
    ));
}

#[test]
fn test_multiple_consumer_types_fail_in_consumer_phase() {
    let yaml = r"
consumer:
  nats:
    url: nats://localhost:4222
  core:
    subject: foo
  kv:
    bucket: foo
    key: bar
sink:
  type: stdout
";
    let steps = parser::parse_steps_str(yaml).unwrap();
    let err = compile(&runtime(), &steps).unwrap_err();
    assert_eq!(err.phase(), Some(CompilePhase::Consumer));
    assert_eq!(
        err.root_validation(),
        Some(&ValidationError::ConsumerType { found: 2 })
    );
}

#[test]
fn test_compiling_twice_is_byte_identical() {
    let steps = parser::parse_steps(&fixture("outlet_stream.yaml")).unwrap();
    let first = compile(&runtime(), &steps).unwrap();
    let second = compile(&runtime(), &steps).unwrap();
    assert_eq!(first, second);
}

/// An empty composite still reaches the runtime as an empty sequence.
#[test]
fn test_empty_composite_is_kept_in_document() {
    let yaml = r"
source:
  type: stdin
transformer:
  composite:
    sequential: []
producer:
  nats:
    url: nats://localhost:4222
  core:
    subject: foo
";
    let steps = parser::parse_steps_str(yaml).unwrap();
    let doc: Value = serde_yaml::from_str(&compile(&runtime(), &steps).unwrap()).unwrap();

    let sequence = path(&doc, "input.processors.0.processors.sequence");
    assert_eq!(sequence.as_sequence().map(Vec::len), Some(0));
}
