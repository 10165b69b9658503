//! tether-agent: Device agent for tether
//!
//! The agent opens a TCP link to the server, logs in with the device's auth
//! token and keeps the session alive, logging application messages as they
//! arrive.

pub mod handler;
pub mod runner;
pub mod transport;

pub use handler::LoggingHandler;
pub use runner::run_until_stopped;
pub use transport::TcpTransport;
