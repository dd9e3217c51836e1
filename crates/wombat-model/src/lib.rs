//! Step specification model for wombat connectors.
//!
//! A connector is described by [`Steps`]: either an inlet (source feeding a
//! NATS producer) or an outlet (NATS consumer feeding a sink), optionally
//! with a [`TransformerStep`] chain. The wire structs keep one optional field
//! per variant so they deserialize from the declarative connector format;
//! each holder exposes a resolver returning a borrowed tagged enum once the
//! exactly-one-of rule has been checked.

pub mod consumer;
pub mod error;
pub mod nats;
pub mod producer;
pub mod runtime;
pub mod steps;
pub mod transformer;

pub use consumer::{
    ConsumerCore, ConsumerKind, ConsumerKv, ConsumerStep, ConsumerStream, DeliverPolicy,
};
pub use error::ValidationError;
pub use nats::NatsConfig;
pub use producer::{ProducerCore, ProducerKind, ProducerKv, ProducerStep, ProducerStream};
pub use runtime::RuntimeContext;
pub use steps::{ConnectorShape, SinkStep, SourceStep, Steps};
pub use transformer::{
    CombineFormat, CombineTransformer, CompositeTransformer, ExplodeFormat, ExplodeTransformer,
    MappingTransformer, ServiceTransformer, TransformerKind, TransformerStep,
};
