//! Consumer steps: the NATS side of an outlet.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::nats::NatsConfig;

/// Reads messages from NATS. Exactly one of `core`, `stream` or `kv` must be
/// set; use [`ConsumerStep::kind`] to resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerStep {
    pub nats: NatsConfig,
    /// Concurrency hint. Parsed but never emitted; consumer inputs have no
    /// matching option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<ConsumerCore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<ConsumerStream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv: Option<ConsumerKv>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCore {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerStream {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_policy: Option<DeliverPolicy>,
    /// Ack wait as a duration string, e.g. `30s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ack_pending: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerKv {
    pub bucket: String,
    pub key: String,
}

/// Where a stream consumer starts reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverPolicy {
    #[default]
    All,
    Last,
    New,
    LastPerSubject,
}

impl DeliverPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last => "last",
            Self::New => "new",
            Self::LastPerSubject => "last_per_subject",
        }
    }
}

/// The resolved consumer variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind<'a> {
    Core(&'a ConsumerCore),
    Stream(&'a ConsumerStream),
    Kv(&'a ConsumerKv),
}

impl ConsumerStream {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            deliver_policy: None,
            ack_wait: None,
            bind: None,
            durable: None,
            max_ack_pending: None,
            queue: None,
        }
    }
}

impl ConsumerStep {
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
    pub fn core(mut self, subject: impl Into<String>, queue: Option<&str>) -> Self {
        self.core = Some(ConsumerCore {
            subject: subject.into(),
            queue: queue.map(str::to_string),
        });
        self
    }

    #[must_use]
    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: ConsumerStream) -> Self {
        self.stream = Some(stream);
        self
    }

    #[must_use]
    pub fn kv(mut self, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        self.kv = Some(ConsumerKv {
            bucket: bucket.into(),
            key: key.into(),
        });
        self
    }

    /// Resolve the single configured variant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ConsumerType`] when zero or several
    /// variants are set.
    pub fn kind(&self) -> Result<ConsumerKind<'_>, ValidationError> {
        match (&self.core, &self.stream, &self.kv) {
            (Some(core), None, None) => Ok(ConsumerKind::Core(core)),
            (None, Some(stream), None) => Ok(ConsumerKind::Stream(stream)),
            (None, None, Some(kv)) => Ok(ConsumerKind::Kv(kv)),
            _ => Err(ValidationError::ConsumerType {
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
