//! Top-level connector description.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consumer::ConsumerStep;
use crate::error::ValidationError;
use crate::producer::ProducerStep;
use crate::transformer::TransformerStep;

/// The full step specification of one connector.
///
/// Valid shapes are inlet (`source` + `producer`) and outlet (`consumer` +
/// `sink`); see [`Steps::shape`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Steps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer: Option<TransformerStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<ProducerStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<ConsumerStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<SinkStep>,
}

/// An external source; `config` is opaque to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStep {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// An external sink; `config` is opaque to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkStep {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl SourceStep {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: Map::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

impl SinkStep {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: Map::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// The connector shape detected from a [`Steps`] value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectorShape<'a> {
    Inlet {
        source: &'a SourceStep,
        producer: &'a ProducerStep,
    },
    Outlet {
        consumer: &'a ConsumerStep,
        sink: &'a SinkStep,
    },
}

impl ConnectorShape<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inlet { .. } => "inlet",
            Self::Outlet { .. } => "outlet",
        }
    }
}

impl Steps {
    pub fn inlet(source: SourceStep, producer: ProducerStep) -> Self {
        Self {
            source: Some(source),
            producer: Some(producer),
            ..Self::default()
        }
    }

    pub fn outlet(consumer: ConsumerStep, sink: SinkStep) -> Self {
        Self {
            consumer: Some(consumer),
            sink: Some(sink),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transformer(mut self, transformer: TransformerStep) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Detect the connector shape. Inlet wins when both pairs are fully
    /// populated.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSteps`] when neither pair is
    /// complete.
    pub fn shape(&self) -> Result<ConnectorShape<'_>, ValidationError> {
        match (&self.source, &self.producer, &self.consumer, &self.sink) {
            (Some(source), Some(producer), _, _) => Ok(ConnectorShape::Inlet { source, producer }),
            (_, _, Some(consumer), Some(sink)) => Ok(ConnectorShape::Outlet { consumer, sink }),
            _ => Err(ValidationError::InvalidSteps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nats::NatsConfig;

    fn nats() -> NatsConfig {
        NatsConfig::new("nats://localhost:4222")
    }

    #[test]
    fn inlet_shape() {
        let steps = Steps::inlet(SourceStep::new("stdin"), ProducerStep::new(nats()).core("a"));
        assert_eq!(steps.shape().unwrap().label(), "inlet");
    }

    #[test]
    fn outlet_shape() {
        let steps = Steps::outlet(
            ConsumerStep::new(nats()).core("a", None),
            SinkStep::new("stdout"),
        );
        assert_eq!(steps.shape().unwrap().label(), "outlet");
    }

    #[test]
    fn half_populated_pairs_are_invalid() {
        let steps = Steps {
            source: Some(SourceStep::new("stdin")),
            sink: Some(SinkStep::new("stdout")),
            ..Steps::default()
        };
        assert_eq!(steps.shape().unwrap_err(), ValidationError::InvalidSteps);
        assert_eq!(Steps::default().shape().unwrap_err(), ValidationError::InvalidSteps);
    }

    #[test]
    fn deserialize_source_type_and_config() {
        let yaml = r#"
source:
  type: generate
  config:
    mapping: 'root = "hello world"'
    count: 5
producer:
  nats:
    url: nats://localhost:4222
  core:
    subject: foo.bar
"#;
        let steps: Steps = serde_yaml::from_str(yaml).unwrap();
        let source = steps.source.as_ref().unwrap();
        assert_eq!(source.kind, "generate");
        assert_eq!(source.config["count"], 5);
        assert!(matches!(steps.shape(), Ok(ConnectorShape::Inlet { .. })));
    }
}
