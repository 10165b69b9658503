//! Concrete transports

mod tcp;

pub use tcp::TcpTransport;
