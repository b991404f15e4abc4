//! Client configuration.

use std::time::Duration;

use bridgefire_protocol::RIVER_COUNT;
use bridgefire_transport::RetryPolicy;

use crate::ClientError;

/// Where the server lives and how hard to try reaching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host name or address of the game server.
    pub host: String,
    /// Port of river 0. River `i` listens on `base_port + i`.
    pub base_port: u16,
    /// Shared secret presented with every request.
    pub secret: String,
    /// Per-attempt timeout and retransmission budget.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            base_port: 51511,
            secret: String::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a config for `host:base_port` with the default retry policy.
    pub fn new(host: impl Into<String>, base_port: u16, secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            base_port,
            secret: secret.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Checks the config and hands it back if it can be used.
    ///
    /// # Errors
    /// `ClientError::Config` if the host or secret is empty, the base port
    /// leaves no room for one port per river, or the attempt timeout is
    /// zero.
    pub fn validated(self) -> Result<Self, ClientError> {
        if self.host.is_empty() {
            return Err(ClientError::Config("host is empty".into()));
        }
        if self.secret.is_empty() {
            return Err(ClientError::Config("secret is empty".into()));
        }
        if self.base_port == 0 {
            return Err(ClientError::Config("base port must be non-zero".into()));
        }
        let last_offset = (RIVER_COUNT - 1) as u16;
        if self.base_port.checked_add(last_offset).is_none() {
            return Err(ClientError::Config(format!(
                "base port {} leaves no room for {RIVER_COUNT} rivers",
                self.base_port
            )));
        }
        if self.retry.attempt_timeout == Duration::ZERO {
            return Err(ClientError::Config("attempt timeout must be non-zero".into()));
        }
        Ok(self)
    }
}
