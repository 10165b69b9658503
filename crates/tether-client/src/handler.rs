//! Application handler seam
//!
//! Inbound `Hardware` frames are handed to a [`CommandHandler`] together with
//! a [`Responder`]. Anything the handler sends through the responder carries
//! the id of the message being handled, so the server can correlate the
//! reply without a lookup table.

use tether_core::{Clock, Transport};
use tether_protocol::{Body, Command, FrameHeader, Status};

use crate::framing;
use crate::session::SessionState;

/// Receives application payloads
pub trait CommandHandler {
    /// Handle one inbound `Hardware` body
    fn handle(&mut self, responder: &mut Responder<'_>, body: Body<'_>);
}

impl<F> CommandHandler for F
where
    F: FnMut(&mut Responder<'_>, Body<'_>),
{
    fn handle(&mut self, responder: &mut Responder<'_>, body: Body<'_>) {
        self(responder, body)
    }
}

/// Outbound half of the engine, lent to handlers
///
/// Sends are fire-and-forget: when the link is down or the write fails the
/// frame is dropped.
pub struct Responder<'a> {
    transport: &'a mut dyn Transport,
    clock: &'a dyn Clock,
    session: &'a mut SessionState,
}

impl<'a> Responder<'a> {
    pub(crate) fn new(
        transport: &'a mut dyn Transport,
        clock: &'a dyn Clock,
        session: &'a mut SessionState,
    ) -> Self {
        Self {
            transport,
            clock,
            session,
        }
    }

    /// Send a `Hardware` frame
    pub fn send(&mut self, data: &[u8]) {
        self.send_split(data, &[]);
    }

    /// Send a `Hardware` frame whose body is `first` followed by `second`
    pub fn send_split(&mut self, first: &[u8], second: &[u8]) {
        if !self.transport.connected() {
            tracing::trace!("link down, dropping {} bytes", first.len() + second.len());
            return;
        }
        let id = self.session.ids.next_id();
        self.send_command(Command::Hardware, id, first, second);
    }

    /// Id of the message being answered, if called from a handler
    pub fn reply_id(&self) -> Option<u16> {
        self.session.ids.reply_id()
    }

    /// Current clock reading
    pub fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    pub(crate) fn send_command(&mut self, command: Command, id: u16, first: &[u8], second: &[u8]) {
        match framing::send_frame(&mut *self.transport, command, id, first, second) {
            Ok(()) => self.session.activity.last_out = self.clock.now_millis(),
            Err(e) => tracing::debug!("Send failed ({:?}, id {}): {}", command, id, e),
        }
    }

    pub(crate) fn send_status(&mut self, id: u16, status: Status) {
        let header = FrameHeader::response(id, status);
        match framing::send_header(&mut *self.transport, &header) {
            Ok(()) => self.session.activity.last_out = self.clock.now_millis(),
            Err(e) => tracing::debug!("Send failed (response, id {}): {}", id, e),
        }
    }

    pub(crate) fn sleep(&self, duration: std::time::Duration) {
        self.clock.sleep(duration);
    }

    pub(crate) fn transport(&mut self) -> &mut (dyn Transport + 'a) {
        &mut *self.transport
    }

    pub(crate) fn session(&mut self) -> &mut SessionState {
        &mut *self.session
    }

    /// Close the link and forget the login
    pub(crate) fn drop_link(&mut self) {
        self.transport.disconnect();
        self.session.unauthenticated();
    }
}
