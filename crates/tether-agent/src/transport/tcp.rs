//! Blocking TCP transport

use std::cell::Cell;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tether_core::config::AgentConfig;
use tether_core::Transport;

const PEEK_SIZE: usize = 1024;

/// TCP link to the server
///
/// Reads block for at most `read_timeout`; a read that times out returns the
/// bytes gathered so far.
pub struct TcpTransport {
    address: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    stream: Option<TcpStream>,
    peer_closed: Cell<bool>,
}

impl TcpTransport {
    /// Create a disconnected transport for `address`
    pub fn new(address: impl Into<String>, connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            address: address.into(),
            connect_timeout,
            read_timeout,
            stream: None,
            peer_closed: Cell::new(false),
        }
    }

    /// Create a transport from agent settings
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.server_address.clone(),
            config.connect_timeout,
            config.read_timeout,
        )
    }

    /// Server address
    pub fn address(&self) -> &str {
        &self.address
    }

    fn open(&self) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.address.to_socket_addrs()? {
            tracing::debug!("Connecting to {}", addr);
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    stream.set_read_timeout(Some(self.read_timeout))?;
                    stream.set_write_timeout(Some(self.read_timeout))?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{} did not resolve", self.address),
            )
        }))
    }

    /// A stream stuck in non-blocking mode would make every read return at
    /// once, so the link is treated as lost.
    fn blocking_restored(&self, result: io::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Can't restore blocking mode: {}", e);
                self.peer_closed.set(true);
                false
            }
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.peer_closed.set(false);
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self) -> io::Result<()> {
        self.close();
        self.stream = Some(self.open()?);
        tracing::debug!("Connected to {}", self.address);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.close();
    }

    fn connected(&self) -> bool {
        self.stream.is_some() && !self.peer_closed.get()
    }

    fn available(&self) -> usize {
        let Some(stream) = &self.stream else {
            return 0;
        };
        if stream.set_nonblocking(true).is_err() {
            return 0;
        }
        let mut buf = [0u8; PEEK_SIZE];
        let peeked = stream.peek(&mut buf);
        if !self.blocking_restored(stream.set_nonblocking(false)) {
            return 0;
        }

        match peeked {
            Ok(0) => {
                tracing::debug!("Peer closed the connection");
                self.peer_closed.set(true);
                0
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => 0,
            Err(e) => {
                tracing::debug!("Peek failed: {}", e);
                self.peer_closed.set(true);
                0
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(0);
        };

        let mut filled = 0;
        while filled < buf.len() {
            match stream.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.peer_closed.set(true);
                    break;
                }
                Ok(n) => filled += n,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                    ) =>
                {
                    break
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.close();
                    return Err(e);
                }
            }
        }
        Ok(filled)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(io::ErrorKind::NotConnected.into());
        };
        match stream.write(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        (listener, address)
    }

    #[test]
    fn test_starts_disconnected() {
        let transport = TcpTransport::new("127.0.0.1:1", Duration::from_secs(1), Duration::from_millis(50));
        assert!(!transport.connected());
        assert_eq!(transport.available(), 0);
    }

    #[test]
    fn test_roundtrip_with_peer() {
        let (listener, address) = listener();
        let mut transport =
            TcpTransport::new(address, Duration::from_secs(1), Duration::from_millis(200));
        transport.connect().unwrap();
        let (mut peer, _) = listener.accept().unwrap();

        assert_eq!(transport.write(b"hello").unwrap(), 5);
        let mut got = [0u8; 5];
        peer.read_exact(&mut got).unwrap();
        assert_eq!(&got, b"hello");

        peer.write_all(b"world").unwrap();
        peer.flush().unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(transport.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn test_read_times_out_with_partial_data() {
        let (listener, address) = listener();
        let mut transport =
            TcpTransport::new(address, Duration::from_secs(1), Duration::from_millis(50));
        transport.connect().unwrap();
        let (mut peer, _) = listener.accept().unwrap();

        peer.write_all(b"ab").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert!(transport.connected());
    }

    #[test]
    fn test_failed_blocking_restore_drops_link() {
        let (listener, address) = listener();
        let mut transport =
            TcpTransport::new(address, Duration::from_secs(1), Duration::from_millis(50));
        transport.connect().unwrap();
        let (mut peer, _) = listener.accept().unwrap();
        peer.write_all(b"abcde").unwrap();

        assert!(transport.blocking_restored(Ok(())));
        assert!(transport.connected());

        let err = io::Error::new(io::ErrorKind::Other, "fcntl failed");
        assert!(!transport.blocking_restored(Err(err)));
        assert!(!transport.connected());

        // Reconnecting clears the flag.
        transport.connect().unwrap();
        assert!(transport.connected());
    }

    #[test]
    fn test_peer_close_is_detected() {
        let (listener, address) = listener();
        let mut transport =
            TcpTransport::new(address, Duration::from_secs(1), Duration::from_millis(50));
        transport.connect().unwrap();
        let (peer, _) = listener.accept().unwrap();
        drop(peer);

        let mut buf = [0u8; 4];
        assert_eq!(transport.read(&mut buf).unwrap(), 0);
        assert!(!transport.connected());

        transport.disconnect();
        assert!(!transport.connected());
    }
}
