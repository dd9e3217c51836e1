//! Structural validation errors for step specifications.

use thiserror::Error;

/// A step specification violates one of its exactly-one-of rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("exactly one producer type (core, stream, kv) must be defined, found {found}")]
    ProducerType { found: usize },

    #[error("exactly one consumer type (core, stream, kv) must be defined, found {found}")]
    ConsumerType { found: usize },

    /// `step` is the dotted location of the offending node, e.g.
    /// `transformer.composite.sequential[2]`.
    #[error(
        "{step}: exactly one transformer type (service, composite, mapping, explode, combine) must be defined, found {found}"
    )]
    TransformerType { step: String, found: usize },

    #[error("invalid steps configuration: expected source and producer, or consumer and sink")]
    InvalidSteps,
}
