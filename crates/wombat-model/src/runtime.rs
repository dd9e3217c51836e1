//! Runtime identity of a connector instance.

use serde::{Deserialize, Serialize};

/// Identity and observability endpoint of the running connector. Empty
/// strings are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeContext {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub connector: String,
    #[serde(default)]
    pub nats_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nats_jwt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nats_seed: Option<String>,
}

impl RuntimeContext {
    pub fn new(
        namespace: impl Into<String>,
        connector: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            connector: connector.into(),
            instance: instance.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_nats_url(mut self, url: impl Into<String>) -> Self {
        self.nats_url = url.into();
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, jwt: impl Into<String>, seed: impl Into<String>) -> Self {
        self.nats_jwt = Some(jwt.into());
        self.nats_seed = Some(seed.into());
        self
    }

    /// Names of the fields the metrics block needs but that are empty.
    pub fn missing_metrics_fields(&self) -> Vec<&'static str> {
        [
            ("nats_url", &self.nats_url),
            ("namespace", &self.namespace),
            ("instance", &self.instance),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// JWT and seed, only when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.nats_jwt.as_deref(), self.nats_seed.as_deref()) {
            (Some(jwt), Some(seed)) if !jwt.is_empty() && !seed.is_empty() => Some((jwt, seed)),
            _ => None,
        }
    }
}
