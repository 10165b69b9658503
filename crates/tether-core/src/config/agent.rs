//! Agent configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::{duration_millis, duration_secs};
use super::SessionConfig;

/// Configuration for the device agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Server address (`host:port`)
    pub server_address: String,

    /// TCP connect timeout
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,

    /// Upper bound on a single blocking read
    #[serde(with = "duration_millis")]
    pub read_timeout: Duration,

    /// Delay between polls of the session engine
    #[serde(with = "duration_millis")]
    pub tick_interval: Duration,

    /// Session settings
    pub session: SessionConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:8442".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_millis(2000),
            tick_interval: Duration::from_millis(10),
            session: SessionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_table() {
        let toml = r#"
            server_address = "device.example.net:8442"
            read_timeout = 500

            [session]
            auth_token = "abc"
            heartbeat_interval = 20
        "#;
        let config: AgentConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server_address, "device.example.net:8442");
        assert_eq!(config.read_timeout, Duration::from_millis(500));
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.session.auth_token, "abc");
        assert_eq!(config.session.heartbeat_interval, Duration::from_secs(20));
    }
}
