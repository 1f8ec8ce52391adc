//! Configuration for the HTTP transport.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for [`crate::HttpTransport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header sent with every metadata request.
    pub user_agent: String,

    /// Total time allowed for one request.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,

    /// Time allowed to establish a connection.
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ogc-tiles/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TILES_USER_AGENT`
    /// - `TILES_REQUEST_TIMEOUT_SECS`
    /// - `TILES_CONNECT_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("TILES_USER_AGENT") {
            if !val.trim().is_empty() {
                config.user_agent = val;
            }
        }

        if let Some(secs) = lookup("TILES_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("TILES_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.connect_timeout = Duration::from_secs(secs);
        }

        config
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
