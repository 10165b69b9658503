//! Per-session state owned by the engine

use crate::handshake::LinkState;
use crate::sequence::SequenceGenerator;

/// Activity timestamps, in clock milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activity {
    /// Last inbound frame
    pub last_in: u64,
    /// Last outbound frame
    pub last_out: u64,
    /// Last ping sent by the heartbeat
    pub last_heartbeat: u64,
}

impl Activity {
    /// All three timestamps set to `now`
    pub fn at(now: u64) -> Self {
        Self {
            last_in: now,
            last_out: now,
            last_heartbeat: now,
        }
    }
}

/// Mutable state of the single session an engine manages
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) link: LinkState,
    pub(crate) activity: Activity,
    pub(crate) ids: SequenceGenerator,
}

impl SessionState {
    /// Fresh, unauthenticated state
    pub fn new(now: u64) -> Self {
        Self {
            link: LinkState::Unauthenticated,
            activity: Activity::at(now),
            ids: SequenceGenerator::new(),
        }
    }

    /// Current handshake state
    pub fn link(&self) -> LinkState {
        self.link
    }

    /// Activity timestamps
    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Id being replied to, if a handler is running
    pub fn reply_id(&self) -> Option<u16> {
        self.ids.reply_id()
    }

    /// Mark the session authenticated and rebase timestamps to `now`
    pub(crate) fn authenticated(&mut self, now: u64) {
        self.link = LinkState::Authenticated;
        self.activity = Activity::at(now);
    }

    pub(crate) fn unauthenticated(&mut self) {
        self.link = LinkState::Unauthenticated;
    }
}
