//! tether-client: Device-side session engine for the tether protocol
//!
//! The [`Engine`] keeps one authenticated session alive over any
//! [`Transport`](tether_core::Transport). Call [`Engine::poll`] from the
//! device's main loop: it logs in when needed, dispatches at most one
//! inbound frame, and sends heartbeats when the link goes quiet.

pub mod dispatch;
pub mod engine;
pub mod framing;
pub mod handler;
pub mod handshake;
pub mod heartbeat;
pub mod sequence;
pub mod session;

pub use engine::Engine;
pub use handler::{CommandHandler, Responder};
pub use handshake::LinkState;
pub use heartbeat::{HeartbeatAction, HeartbeatMonitor};
pub use sequence::SequenceGenerator;
pub use session::{Activity, SessionState};
