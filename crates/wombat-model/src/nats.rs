//! NATS connection settings shared by producers, consumers and service
//! transformers.

use serde::{Deserialize, Serialize};

/// Connection parameters for a NATS endpoint.
///
/// `jwt` and `seed` are independent: with `auth_enabled` set, each one that
/// is present is rendered, the other is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatsConfig {
    pub url: String,
    #[serde(default)]
    pub auth_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl NatsConfig {
    /// Unauthenticated connection to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_enabled: false,
            jwt: None,
            seed: None,
        }
    }

    /// Enable authentication with whichever credentials are given.
    #[must_use]
    pub fn with_auth(mut self, jwt: Option<&str>, seed: Option<&str>) -> Self {
        self.auth_enabled = true;
        self.jwt = jwt.map(str::to_string);
        self.seed = seed.map(str::to_string);
        self
    }
}
