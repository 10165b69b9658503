//! Scripted collaborators for tests
//!
//! [`ScriptedTransport`] is a cloneable handle: give one clone to the engine
//! and keep another to feed inbound bytes and inspect what was written.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use tether_protocol::{Command, FrameHeader, HEADER_SIZE};

use crate::traits::Transport;

pub use crate::time::ManualClock;

#[derive(Debug, Default)]
struct Script {
    connected: bool,
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    connect_failures: usize,
    connects: usize,
    disconnects: usize,
    reads: usize,
    read_limit: Option<usize>,
}

/// In-memory transport driven by the test
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

/// A frame captured from the outbound byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFrame {
    /// Decoded header
    pub header: FrameHeader,
    /// Body bytes; always empty for responses
    pub body: Vec<u8>,
}

impl ScriptedTransport {
    /// Create a disconnected transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw inbound bytes
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.script.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    /// Queue an inbound frame
    pub fn push_frame(&self, header: FrameHeader, body: &[u8]) {
        self.push_inbound(&header.to_bytes());
        self.push_inbound(body);
    }

    /// Queue a server reply to the login frame
    pub fn push_login_reply(&self, status: u16) {
        self.push_frame(
            FrameHeader {
                command: Command::Response.as_u8(),
                msg_id: 1,
                length: status,
            },
            &[],
        );
    }

    /// Make the next `count` connect attempts fail
    pub fn fail_connects(&self, count: usize) {
        self.script.borrow_mut().connect_failures = count;
    }

    /// Cap the next read call at `limit` bytes
    ///
    /// Models a peer that stalls mid-frame: the remaining bytes stay queued
    /// and are returned by later reads.
    pub fn truncate_next_read(&self, limit: usize) {
        self.script.borrow_mut().read_limit = Some(limit);
    }

    /// Drop the link as if the peer went away
    pub fn drop_link(&self) {
        let mut script = self.script.borrow_mut();
        script.connected = false;
        script.inbound.clear();
    }

    /// Take every byte written so far
    pub fn take_outbound(&self) -> Vec<u8> {
        std::mem::take(&mut self.script.borrow_mut().outbound)
    }

    /// Take and decode every frame written so far
    ///
    /// Responses carry a status in the length field and never have a body.
    pub fn take_frames(&self) -> Vec<WrittenFrame> {
        let bytes = self.take_outbound();
        let mut frames = Vec::new();
        let mut rest = bytes.as_slice();
        while let Some(header) = FrameHeader::parse(rest) {
            rest = &rest[HEADER_SIZE..];

            let body_len = if header.command() == Some(Command::Response) {
                0
            } else {
                usize::from(header.length).min(rest.len())
            };
            frames.push(WrittenFrame {
                header,
                body: rest[..body_len].to_vec(),
            });
            rest = &rest[body_len..];
        }
        frames
    }

    /// Inbound bytes not yet read
    pub fn pending_inbound(&self) -> usize {
        self.script.borrow().inbound.len()
    }

    /// Number of successful connects
    pub fn connect_count(&self) -> usize {
        self.script.borrow().connects
    }

    /// Number of disconnects
    pub fn disconnect_count(&self) -> usize {
        self.script.borrow().disconnects
    }

    /// Number of read calls
    pub fn read_count(&self) -> usize {
        self.script.borrow().reads
    }

    /// Whether the link is open
    pub fn is_connected(&self) -> bool {
        self.script.borrow().connected
    }
}

impl Transport for ScriptedTransport {
    fn connect(&mut self) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        if script.connect_failures > 0 {
            script.connect_failures -= 1;
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted connect failure",
            ));
        }
        script.connected = true;
        script.connects += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut script = self.script.borrow_mut();
        script.connected = false;
        script.disconnects += 1;
        script.inbound.clear();
    }

    fn connected(&self) -> bool {
        self.script.borrow().connected
    }

    fn available(&self) -> usize {
        let script = self.script.borrow();
        if script.connected {
            script.inbound.len()
        } else {
            0
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut script = self.script.borrow_mut();
        script.reads += 1;
        let limit = script.read_limit.take().unwrap_or(usize::MAX);
        if !script.connected {
            return Ok(0);
        }
        let n = buf.len().min(script.inbound.len()).min(limit);
        for (slot, byte) in buf.iter_mut().zip(script.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut script = self.script.borrow_mut();
        if !script.connected {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "link closed"));
        }
        script.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_is_bounded_by_script() {
        let mut transport = ScriptedTransport::new();
        transport.connect().unwrap();
        transport.push_inbound(b"abc");

        let mut buf = [0u8; 8];
        assert_eq!(transport.available(), 3);
        assert_eq!(transport.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(transport.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_truncate_next_read_applies_once() {
        let mut transport = ScriptedTransport::new();
        transport.connect().unwrap();
        transport.push_inbound(b"hello");
        transport.truncate_next_read(2);

        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"he");
        assert_eq!(transport.pending_inbound(), 3);
        assert_eq!(transport.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"llo");
    }

    #[test]
    fn test_disconnect_drops_inbound() {
        let mut transport = ScriptedTransport::new();
        transport.connect().unwrap();
        transport.push_inbound(b"abc");
        transport.disconnect();
        assert_eq!(transport.pending_inbound(), 0);
        assert_eq!(transport.disconnect_count(), 1);
        assert!(transport.write(b"x").is_err());
    }

    #[test]
    fn test_connect_failures() {
        let mut transport = ScriptedTransport::new();
        transport.fail_connects(1);
        assert!(transport.connect().is_err());
        assert!(transport.connect().is_ok());
        assert_eq!(transport.connect_count(), 1);
    }

    #[test]
    fn test_take_frames() {
        let mut transport = ScriptedTransport::new();
        transport.connect().unwrap();
        let ping = FrameHeader::new(Command::Ping, 3, 0);
        let hw = FrameHeader::new(Command::Hardware, 4, 2);
        let resp = FrameHeader {
            command: 0,
            msg_id: 5,
            length: 200,
        };
        transport.write(&ping.to_bytes()).unwrap();
        transport.write(&hw.to_bytes()).unwrap();
        transport.write(b"hi").unwrap();
        transport.write(&resp.to_bytes()).unwrap();

        let frames = transport.take_frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].body, b"hi");
        assert_eq!(frames[2].header, resp);
        assert!(frames[2].body.is_empty());
        assert!(transport.take_outbound().is_empty());
    }
}
