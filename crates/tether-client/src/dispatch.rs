//! Inbound frame classification
//!
//! | command    | action                                              |
//! |------------|-----------------------------------------------------|
//! | `Response` | note inbound activity; the length is a status       |
//! | `Ping`     | answer with `Response(Success)` on the same id      |
//! | `Hardware` | hand the body to the application handler            |
//! | other      | protocol violation: disconnect                      |
//!
//! A body longer than the configured maximum is a violation and is never
//! read. A body that arrives short is dropped without disconnecting.

use tether_protocol::{Command, ProtocolError, Status};

use crate::framing;
use crate::handler::{CommandHandler, Responder};

/// What happened to an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No complete header was available
    NoFrame,
    /// A response arrived carrying this status
    Response(u16),
    /// A ping was answered
    PingAnswered(u16),
    /// A body was handed to the handler
    Delivered(u16),
    /// The body arrived short and was dropped
    Dropped,
    /// The frame broke the protocol and the link was closed
    Violation,
}

/// Read and dispatch one frame
///
/// `rx_buf` must be at least `max_body_len + 1` bytes.
pub fn process_input<H: CommandHandler + ?Sized>(
    responder: &mut Responder<'_>,
    rx_buf: &mut [u8],
    max_body_len: usize,
    handler: &mut H,
) -> Dispatch {
    let header = match framing::read_header(responder.transport()) {
        Ok(header) => header,
        Err(e) => {
            tracing::trace!("No frame: {}", e);
            return Dispatch::NoFrame;
        }
    };

    let command = header.command();
    if command == Some(Command::Response) {
        tracing::debug!("Got response: {}", header.length);
        let now = responder.now();
        responder.session().activity.last_in = now;
        return Dispatch::Response(header.length);
    }

    let length = usize::from(header.length);
    if length > max_body_len {
        let err = ProtocolError::BodyTooLarge {
            size: length,
            max: max_body_len,
        };
        tracing::warn!("{}", err);
        responder.drop_link();
        return Dispatch::Violation;
    }

    let body = match framing::read_body(responder.transport(), rx_buf, length) {
        Ok(body) => body,
        Err(ProtocolError::ShortBody { expected, actual }) => {
            tracing::warn!("Can't read body ({} of {} bytes)", actual, expected);
            return Dispatch::Dropped;
        }
        Err(e) => {
            tracing::warn!("Can't read body: {}", e);
            return Dispatch::Dropped;
        }
    };
    tracing::trace!(msg_id = header.msg_id, "> {}", String::from_utf8_lossy(body.as_bytes()));

    let now = responder.now();
    responder.session().activity.last_in = now;

    match command {
        Some(Command::Ping) => {
            responder.send_status(header.msg_id, Status::Success);
            responder.session().activity.last_out = now;
            Dispatch::PingAnswered(header.msg_id)
        }
        Some(Command::Hardware) => {
            responder.session().ids.begin_reply(header.msg_id);
            handler.handle(responder, body);
            responder.session().ids.end_reply();
            Dispatch::Delivered(header.msg_id)
        }
        _ => {
            tracing::warn!("{}", ProtocolError::UnknownCommand(header.command));
            responder.drop_link();
            Dispatch::Violation
        }
    }
}
