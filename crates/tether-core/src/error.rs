//! Core error types for tether

use std::path::PathBuf;

use tether_protocol::ProtocolError;
use thiserror::Error;

/// Top-level error type for the tether ecosystem
#[derive(Error, Debug)]
pub enum TetherError {
    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Handshake error
    #[error("Handshake error: {0}")]
    Handshake(#[from] HandshakeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a login attempt failed
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// Transport could not connect
    #[error("Connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// No reply arrived
    #[error("Timeout")]
    Timeout,

    /// Server rejected the auth token
    #[error("Invalid auth token")]
    InvalidToken,

    /// Server answered with a status other than success
    #[error("Connect failed (code: {status})")]
    Rejected { status: u16 },

    /// Reply was not a response to the login frame
    #[error("Unexpected reply (command: {command}, id: {msg_id})")]
    UnexpectedReply { command: u8, msg_id: u16 },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
