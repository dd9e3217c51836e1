//! Producer steps: the NATS side of an inlet.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::nats::NatsConfig;

/// Publishes messages onto NATS. Exactly one of `core`, `stream` or `kv`
/// must be set; use [`ProducerStep::kind`] to resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerStep {
    pub nats: NatsConfig,
    /// Maximum number of in-flight messages. Defaults to 1 when rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<ProducerCore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<ProducerStream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv: Option<ProducerKv>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerCore {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerStream {
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerKv {
    pub bucket: String,
    pub key: String,
}

/// The resolved producer variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerKind<'a> {
    Core(&'a ProducerCore),
    Stream(&'a ProducerStream),
    Kv(&'a ProducerKv),
}

impl ProducerStep {
    pub fn new(nats: NatsConfig) -> Self {
        Self {
            nats,
            threads: None,
            core: None,
            stream: None,
            kv: None,
        }
    }

    #[must_use]
    pub fn core(mut self, subject: impl Into<String>) -> Self {
        self.core = Some(ProducerCore {
            subject: subject.into(),
        });
        self
    }

    #[must_use]
    pub fn stream(mut self, subject: impl Into<String>) -> Self {
        self.stream = Some(ProducerStream {
            subject: subject.into(),
        });
        self
    }

    #[must_use]
    pub fn kv(mut self, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        self.kv = Some(ProducerKv {
            bucket: bucket.into(),
            key: key.into(),
        });
        self
    }

    #[must_use]
    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Resolve the single configured variant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ProducerType`] when zero or several
    /// variants are set.
    pub fn kind(&self) -> Result<ProducerKind<'_>, ValidationError> {
        match (&self.core, &self.stream, &self.kv) {
            (Some(core), None, None) => Ok(ProducerKind::Core(core)),
            (None, Some(stream), None) => Ok(ProducerKind::Stream(stream)),
            (None, None, Some(kv)) => Ok(ProducerKind::Kv(kv)),
            _ => Err(ValidationError::ProducerType {
                found: [
                    self.core.is_some(),
                    self.stream.is_some(),
                    self.kv.is_some(),
                ]
                .into_iter()
                .filter(|set| *set)
                .count(),
            }),
        }
    }
}
