//! Link liveness policy
//!
//! With heartbeat interval `H` and timeout margin `T`:
//!
//! - no inbound traffic for more than `H + 3T`: the link is dead
//! - no inbound or no outbound traffic for more than `H`, and no ping for
//!   more than `T`: send a ping
//!
//! Pings are therefore never sent more often than once per `T`.

use std::time::Duration;

use tether_core::time::elapsed_millis;
use tether_core::SessionConfig;

use crate::session::Activity;

/// What the heartbeat check wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatAction {
    /// Nothing to do
    Idle,
    /// Send a ping
    SendPing,
    /// Peer has been silent too long; disconnect
    LinkDead,
}

/// Decides when to ping the peer and when to give up on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatMonitor {
    interval_ms: u64,
    margin_ms: u64,
    dead_ms: u64,
}

impl HeartbeatMonitor {
    /// Create a monitor; the interval is truncated to whole seconds
    pub fn new(interval: Duration, margin: Duration) -> Self {
        Self::from_config(&SessionConfig {
            heartbeat_interval: interval,
            timeout_margin: margin,
            ..SessionConfig::default()
        })
    }

    /// Create a monitor from session settings
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            interval_ms: config.heartbeat_millis(),
            margin_ms: config.margin_millis(),
            dead_ms: config.dead_link_millis(),
        }
    }

    /// Inbound silence after which the link is dead
    pub fn dead_after_millis(&self) -> u64 {
        self.dead_ms
    }

    /// Evaluate the policy at time `now`
    pub fn evaluate(&self, now: u64, activity: &Activity) -> HeartbeatAction {
        let since_in = elapsed_millis(now, activity.last_in);
        let since_out = elapsed_millis(now, activity.last_out);
        let since_ping = elapsed_millis(now, activity.last_heartbeat);

        if since_in > self.dead_after_millis() {
            HeartbeatAction::LinkDead
        } else if (since_in > self.interval_ms || since_out > self.interval_ms)
            && since_ping > self.margin_ms
        {
            HeartbeatAction::SendPing
        } else {
            HeartbeatAction::Idle
        }
    }
}
