//! Session engine
//!
//! # Architecture: Poll-Driven State Machine
//!
//! The engine owns the transport, the application handler, a clock and the
//! session state. The device's main loop calls [`Engine::poll`] on every
//! tick; each call:
//!
//! 1. Logs in if the session is not authenticated
//! 2. Reads and dispatches at most one frame, if a full header is waiting
//! 3. Applies the heartbeat policy
//!
//! `poll` never returns an error. Failures close the transport and the next
//! `poll` starts over with a fresh login.

use tether_core::{Clock, HandshakeError, SessionConfig, SystemClock, Transport};
use tether_protocol::{Command, HEADER_SIZE};

use crate::dispatch::{self, Dispatch};
use crate::handler::{CommandHandler, Responder};
use crate::handshake::{self, LinkState};
use crate::heartbeat::{HeartbeatAction, HeartbeatMonitor};
use crate::session::SessionState;

/// Device-side protocol engine for one session
pub struct Engine<T, H, C = SystemClock> {
    transport: T,
    handler: H,
    clock: C,
    config: SessionConfig,
    heartbeat: HeartbeatMonitor,
    session: SessionState,
    rx_buf: Vec<u8>,
}

impl<T, H> Engine<T, H>
where
    T: Transport,
    H: CommandHandler,
{
    /// Create an engine using the system clock
    pub fn new(transport: T, handler: H, config: SessionConfig) -> Self {
        Self::with_clock(transport, handler, SystemClock::new(), config)
    }
}

impl<T, H, C> Engine<T, H, C>
where
    T: Transport,
    H: CommandHandler,
    C: Clock,
{
    /// Create an engine with an explicit clock
    pub fn with_clock(transport: T, handler: H, clock: C, config: SessionConfig) -> Self {
        let now = clock.now_millis();
        Self {
            heartbeat: HeartbeatMonitor::from_config(&config),
            // Wire lengths are u16; a larger limit never needs more room.
            rx_buf: vec![0; config.max_body_len.min(usize::from(u16::MAX)) + 1],
            session: SessionState::new(now),
            transport,
            handler,
            clock,
            config,
        }
    }

    /// Run one tick of the protocol
    pub fn poll(&mut self) {
        if !self.is_authenticated() && self.connect().is_err() {
            return;
        }

        if self.transport.available() >= HEADER_SIZE {
            self.process_input();
        }

        if self.transport.connected() {
            self.check_heartbeat();
        }
    }

    /// Make one login attempt
    ///
    /// On failure the transport is closed and the configured cooldown has
    /// already elapsed when this returns.
    pub fn connect(&mut self) -> Result<(), HandshakeError> {
        let cooldown = self.config.reconnect_delay;
        let mut responder = Responder::new(&mut self.transport, &self.clock, &mut self.session);
        handshake::run(&mut responder, self.config.auth_token.as_bytes(), cooldown)
    }

    /// Send an application payload
    ///
    /// Dropped silently when the link is down.
    pub fn send(&mut self, data: &[u8]) {
        self.responder().send(data);
    }

    /// Send an application payload split across two buffers
    pub fn send_split(&mut self, first: &[u8], second: &[u8]) {
        self.responder().send_split(first, second);
    }

    /// Whether the transport is up and the login was accepted
    pub fn is_authenticated(&self) -> bool {
        self.session.link() == LinkState::Authenticated && self.transport.connected()
    }

    /// Handshake state, ignoring transport connectivity
    pub fn link_state(&self) -> LinkState {
        self.session.link()
    }

    /// Session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Session settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The application handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The application handler, mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn responder(&mut self) -> Responder<'_> {
        Responder::new(&mut self.transport, &self.clock, &mut self.session)
    }

    fn process_input(&mut self) -> Dispatch {
        let mut responder = Responder::new(&mut self.transport, &self.clock, &mut self.session);
        dispatch::process_input(
            &mut responder,
            &mut self.rx_buf,
            self.config.max_body_len,
            &mut self.handler,
        )
    }

    fn check_heartbeat(&mut self) {
        let now = self.clock.now_millis();
        match self.heartbeat.evaluate(now, &self.session.activity()) {
            HeartbeatAction::Idle => {}
            HeartbeatAction::LinkDead => {
                tracing::warn!(
                    "Heartbeat timeout (last in: {})",
                    self.session.activity().last_in
                );
                self.transport.disconnect();
                self.session.unauthenticated();
            }
            HeartbeatAction::SendPing => {
                tracing::debug!("Heartbeat");
                let id = self.session.ids.next_id();
                self.responder().send_command(Command::Ping, id, &[], &[]);
                self.session.activity.last_out = now;
                self.session.activity.last_heartbeat = now;
            }
        }
    }
}
