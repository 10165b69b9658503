//! tether-core: Collaborator traits, configuration and errors for tether
//!
//! This crate provides the seams the session engine is built against (the
//! byte transport and the clock), the session configuration, and the error
//! taxonomy shared by the engine and the agent.

pub mod config;
pub mod error;
pub mod time;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::SessionConfig;
pub use error::{ConfigError, HandshakeError, TetherError};
pub use time::{Clock, SystemClock};
pub use traits::Transport;
