//! tether-protocol: Wire format for the tether device session protocol
//!
//! This crate defines the fixed 5-byte frame header, the command and status
//! codes, and the zero-terminated body view handed to application handlers.

pub mod body;
pub mod command;
pub mod error;
pub mod frame;

pub use body::Body;
pub use command::{Command, Status};
pub use error::ProtocolError;
pub use frame::{FrameHeader, HEADER_SIZE};
