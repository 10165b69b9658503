//! Transport trait

use std::io;

/// Byte-oriented link to the server
///
/// Implemented by whatever actually moves the bytes: a TCP stream, a serial
/// line, a radio modem. Reads and writes are blocking; the implementation is
/// responsible for bounding them with its own timeouts.
pub trait Transport {
    /// Open the link
    fn connect(&mut self) -> io::Result<()>;

    /// Close the link. Unread inbound bytes are dropped.
    fn disconnect(&mut self);

    /// Whether the link is currently open
    fn connected(&self) -> bool;

    /// Number of inbound bytes that can be read without blocking
    fn available(&self) -> usize;

    /// Read up to `buf.len()` bytes, blocking until the buffer is full or the
    /// transport gives up. Returns the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write `buf`, returning the number of bytes accepted
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> io::Result<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn connected(&self) -> bool {
        (**self).connected()
    }

    fn available(&self) -> usize {
        (**self).available()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }
}
