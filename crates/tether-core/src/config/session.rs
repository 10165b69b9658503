//! Session configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::serde_utils::{duration_millis, duration_secs};
use crate::error::ConfigError;

/// Settings for one authenticated session with the server
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Auth token sent verbatim in the login frame
    pub auth_token: String,

    /// Idle time after which a ping is sent
    #[serde(with = "duration_secs")]
    pub heartbeat_interval: Duration,

    /// Minimum spacing between pings; the link is declared dead after
    /// `heartbeat_interval + 3 * timeout_margin` without inbound traffic
    #[serde(with = "duration_millis")]
    pub timeout_margin: Duration,

    /// Largest accepted inbound body
    pub max_body_len: usize,

    /// Cooldown after a failed login
    #[serde(with = "duration_secs")]
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            heartbeat_interval: Duration::from_secs(10),
            timeout_margin: Duration::from_millis(2000),
            max_body_len: 256,
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl SessionConfig {
    /// Create a config with default timing for `auth_token`
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    /// Heartbeat interval in milliseconds, whole seconds only
    ///
    /// Saturates at `u64::MAX`, as do the other millisecond helpers.
    pub fn heartbeat_millis(&self) -> u64 {
        self.heartbeat_interval.as_secs().saturating_mul(1000)
    }

    /// Timeout margin in milliseconds
    pub fn margin_millis(&self) -> u64 {
        u64::try_from(self.timeout_margin.as_millis()).unwrap_or(u64::MAX)
    }

    /// Inbound silence after which the link is considered dead
    pub fn dead_link_millis(&self) -> u64 {
        self.heartbeat_millis()
            .saturating_add(self.margin_millis().saturating_mul(3))
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_token.is_empty() {
            return Err(ConfigError::Invalid("auth_token must not be empty".into()));
        }
        if self.heartbeat_interval.as_secs() == 0 {
            return Err(ConfigError::Invalid(
                "heartbeat_interval must be at least one second".into(),
            ));
        }
        if self.timeout_margin.is_zero() {
            return Err(ConfigError::Invalid("timeout_margin must not be zero".into()));
        }
        if self.max_body_len == 0 {
            return Err(ConfigError::Invalid("max_body_len must not be zero".into()));
        }
        if self.max_body_len > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "max_body_len must not exceed {}",
                u16::MAX
            )));
        }
        Ok(())
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("auth_token", &"<redacted>")
            .field("heartbeat_interval", &self.heartbeat_interval)
            .field("timeout_margin", &self.timeout_margin)
            .field("max_body_len", &self.max_body_len)
            .field("reconnect_delay", &self.reconnect_delay)
            .finish()
    }
}
