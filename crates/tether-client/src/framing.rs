//! Frame I/O over a transport
//!
//! Frames are read straight off the transport into a caller-owned buffer;
//! there is no buffering of partial frames between polls.

use std::io;

use tether_core::Transport;
use tether_protocol::{Body, Command, FrameHeader, ProtocolError, HEADER_SIZE};

/// Read exactly one header
///
/// An incomplete read means no frame is ready; callers treat it as "nothing
/// to do yet".
pub fn read_header<T: Transport + ?Sized>(transport: &mut T) -> Result<FrameHeader, ProtocolError> {
    let mut raw = [0u8; HEADER_SIZE];
    let actual = transport.read(&mut raw)?;
    if actual != HEADER_SIZE {
        return Err(ProtocolError::IncompleteHeader {
            expected: HEADER_SIZE,
            actual,
        });
    }

    let header = FrameHeader::from_bytes(&raw);
    tracing::trace!(
        command = header.command,
        msg_id = header.msg_id,
        length = header.length,
        "frame header"
    );
    Ok(header)
}

/// Read a body of `length` bytes into `buf` and zero-terminate it
///
/// `buf` must hold at least `length + 1` bytes.
pub fn read_body<'b, T: Transport + ?Sized>(
    transport: &mut T,
    buf: &'b mut [u8],
    length: usize,
) -> Result<Body<'b>, ProtocolError> {
    if length >= buf.len() {
        return Err(ProtocolError::BodyTooLarge {
            size: length,
            max: buf.len().saturating_sub(1),
        });
    }

    let actual = transport.read(&mut buf[..length])?;
    if actual != length {
        return Err(ProtocolError::ShortBody {
            expected: length,
            actual,
        });
    }
    buf[length] = 0;

    Body::from_nul_terminated(&buf[..=length]).ok_or(ProtocolError::ShortBody {
        expected: length,
        actual,
    })
}

/// Write a frame whose body is split across two segments
///
/// The header length is the sum of both segments; an empty `second` is not
/// written.
pub fn send_frame<T: Transport + ?Sized>(
    transport: &mut T,
    command: Command,
    msg_id: u16,
    first: &[u8],
    second: &[u8],
) -> Result<(), ProtocolError> {
    let size = first.len() + second.len();
    let length = u16::try_from(size).map_err(|_| ProtocolError::BodyTooLarge {
        size,
        max: usize::from(u16::MAX),
    })?;

    let header = FrameHeader::new(command, msg_id, length);
    write_all(transport, &header.to_bytes())?;
    write_all(transport, first)?;
    if !second.is_empty() {
        write_all(transport, second)?;
    }

    tracing::trace!(command = ?command, msg_id, length, "frame sent");
    Ok(())
}

/// Write a bare header, used for responses whose length field is a status
pub fn send_header<T: Transport + ?Sized>(
    transport: &mut T,
    header: &FrameHeader,
) -> Result<(), ProtocolError> {
    write_all(transport, &header.to_bytes())?;
    tracing::trace!(
        command = header.command,
        msg_id = header.msg_id,
        length = header.length,
        "header sent"
    );
    Ok(())
}

fn write_all<T: Transport + ?Sized>(transport: &mut T, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match transport.write(buf)? {
            0 => return Err(io::ErrorKind::WriteZero.into()),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}
