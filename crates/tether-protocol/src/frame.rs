//! Frame header encoding/decoding
//!
//! The frame format uses a 5-byte header:
//! - command: 1 byte (u8)
//! - msg_id: 2 bytes (u16, big-endian, 0 reserved)
//! - length: 2 bytes (u16, big-endian)
//!
//! For `Response` frames `length` holds a status code instead of a body size.

use bytes::{Buf, BufMut};

use crate::command::{Command, Status};

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 5;

/// Frame header: command code, correlation id and body length
///
/// The command is kept as a raw byte so that frames with unknown commands can
/// still be decoded and then rejected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Raw command code
    pub command: u8,
    /// Correlation id
    pub msg_id: u16,
    /// Body length in bytes, or a status code for responses
    pub length: u16,
}

impl FrameHeader {
    /// Create a new frame header
    pub fn new(command: Command, msg_id: u16, length: u16) -> Self {
        Self {
            command: command.as_u8(),
            msg_id,
            length,
        }
    }

    /// Header of a `Response` frame carrying `status`
    pub fn response(msg_id: u16, status: Status) -> Self {
        Self::new(Command::Response, msg_id, status.as_u16())
    }

    /// Decoded command, if known
    pub fn command(&self) -> Option<Command> {
        Command::from_u8(self.command)
    }

    /// Length field interpreted as a status code
    pub fn status(&self) -> Option<Status> {
        Status::from_u16(self.length)
    }

    /// Encode the header into a fixed array
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [0u8; HEADER_SIZE];
        let mut dst = &mut raw[..];
        dst.put_u8(self.command);
        dst.put_u16(self.msg_id);
        dst.put_u16(self.length);
        raw
    }

    /// Decode a header from a fixed array
    pub fn from_bytes(raw: &[u8; HEADER_SIZE]) -> Self {
        let mut src = &raw[..];
        Self {
            command: src.get_u8(),
            msg_id: src.get_u16(),
            length: src.get_u16(),
        }
    }

    /// Decode a header from the front of `src`
    ///
    /// Returns None without consuming anything if fewer than
    /// [`HEADER_SIZE`] bytes remain.
    pub fn parse(src: &[u8]) -> Option<Self> {
        let raw: &[u8; HEADER_SIZE] = src.get(..HEADER_SIZE)?.try_into().ok()?;
        Some(Self::from_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = FrameHeader::new(Command::Hardware, 0xBEEF, 300);
        let raw = header.to_bytes();
        assert_eq!(raw.len(), HEADER_SIZE);
        assert_eq!(FrameHeader::from_bytes(&raw), header);
    }

    #[test]
    fn test_network_byte_order() {
        let header = FrameHeader::new(Command::Login, 1, 0x0102);
        assert_eq!(header.to_bytes(), [2, 0x00, 0x01, 0x01, 0x02]);
        assert_eq!(
            FrameHeader::from_bytes(&[20, 0xFF, 0xFE, 0x80, 0x01]),
            FrameHeader::new(Command::Hardware, 0xFFFE, 0x8001)
        );
    }

    #[test]
    fn test_response_carries_status() {
        let header = FrameHeader::response(7, Status::Success);
        assert_eq!(header.command(), Some(Command::Response));
        assert_eq!(header.length, 200);
        assert_eq!(header.status(), Some(Status::Success));
        assert_eq!(header.to_bytes(), [0, 0, 7, 0, 200]);
    }

    #[test]
    fn test_parse_insufficient_bytes() {
        assert!(FrameHeader::parse(&[20u8, 0, 1, 0]).is_none());
        assert!(FrameHeader::parse(&[]).is_none());
    }

    #[test]
    fn test_parse_ignores_trailing_body() {
        let header = FrameHeader::parse(&[20, 0, 9, 0, 2, b'a', 0]).unwrap();
        assert_eq!(header, FrameHeader::new(Command::Hardware, 9, 2));
    }

    #[test]
    fn test_unknown_command_still_decodes() {
        let header = FrameHeader::parse(&[0xFE, 0, 3, 0, 10]).unwrap();
        assert_eq!(header.command, 0xFE);
        assert_eq!(header.command(), None);
        assert_eq!(header.msg_id, 3);
        assert_eq!(header.length, 10);
    }
}
