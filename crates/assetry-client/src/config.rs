//! Connection settings for the remote store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the remote store lives and how to authenticate.
///
/// An empty `url` means "no remote configured": the console then runs
/// against an in-process store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Project base URL, e.g. `https://example.supabase.co`
    pub url: String,

    /// Anonymous/service API key, sent as `apikey` and bearer token
    pub api_key: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given endpoint and key.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Builder-style timeout override.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout as a `Duration` (never zero).
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Returns `true` when a remote endpoint is configured.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
