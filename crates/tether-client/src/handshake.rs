//! Login handshake
//!
//! ```text
//! ┌─────────────────┐  connect + Login(id 1) + Response(ok)  ┌───────────────┐
//! │ Unauthenticated │───────────────────────────────────────>│ Authenticated │
//! └─────────────────┘<───────────────────────────────────────└───────────────┘
//!                      disconnect (violation, dead link)
//! ```
//!
//! A failed attempt closes the link and waits out a fixed cooldown. There is
//! no backoff: every retry is identical.

use std::time::Duration;

use tether_core::HandshakeError;
use tether_protocol::{Command, FrameHeader, Status};

use crate::framing;
use crate::handler::Responder;

/// Message id of the login frame and its reply
pub const LOGIN_MSG_ID: u16 = 1;

/// Whether the session has completed a login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No login on the current link
    Unauthenticated,
    /// Login accepted
    Authenticated,
}

/// Run one login attempt, cooling down on failure
pub fn run(
    responder: &mut Responder<'_>,
    token: &[u8],
    cooldown: Duration,
) -> Result<(), HandshakeError> {
    match login(responder, token) {
        Ok(()) => {
            tracing::info!("tether v{} connected", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Err(e) => {
            tracing::warn!("{}", e);
            responder.drop_link();
            responder.sleep(cooldown);
            Err(e)
        }
    }
}

/// Connect if needed, send the token and wait for the verdict
pub fn login(responder: &mut Responder<'_>, token: &[u8]) -> Result<(), HandshakeError> {
    if !responder.transport().connected() {
        responder
            .transport()
            .connect()
            .map_err(HandshakeError::ConnectFailed)?;
    }

    responder.send_command(Command::Login, LOGIN_MSG_ID, token, &[]);

    let header = match framing::read_header(responder.transport()) {
        Ok(header) => header,
        Err(e) => {
            tracing::debug!("No login reply: {}", e);
            return Err(HandshakeError::Timeout);
        }
    };
    check_reply(&header)?;

    let now = responder.now();
    responder.session().authenticated(now);
    Ok(())
}

/// Classify the server's reply to the login frame
pub fn check_reply(header: &FrameHeader) -> Result<(), HandshakeError> {
    if header.command() != Some(Command::Response) || header.msg_id != LOGIN_MSG_ID {
        return Err(HandshakeError::UnexpectedReply {
            command: header.command,
            msg_id: header.msg_id,
        });
    }

    match header.status() {
        Some(status) if status.is_login_accepted() => Ok(()),
        Some(Status::InvalidToken) => Err(HandshakeError::InvalidToken),
        Some(Status::Timeout) => Err(HandshakeError::Timeout),
        _ => Err(HandshakeError::Rejected {
            status: header.length,
        }),
    }
}
