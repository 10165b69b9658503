//! Command and status codes
//!
//! Every frame carries a one-byte command code. Only four commands take part
//! in a device session:
//!
//! 1. Device connects and sends `Login` with the auth token as body
//! 2. Server answers with a `Response` whose length field holds a [`Status`]
//! 3. Either side may send `Ping`; the peer answers with a `Response`
//! 4. Application traffic flows as `Hardware` frames in both directions
//!
//! A `Response` frame has no body: its length field is reused for the status.

/// Command code carried in the first header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Status reply to a previous frame
    Response = 0,
    /// Credential exchange, always sent with message id 1
    Login = 2,
    /// Liveness check
    Ping = 6,
    /// Application payload
    Hardware = 20,
}

impl Command {
    /// Convert to u8
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Response),
            2 => Some(Self::Login),
            6 => Some(Self::Ping),
            20 => Some(Self::Hardware),
            _ => None,
        }
    }
}

/// Status codes carried in the length field of a `Response` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Status {
    /// Command accepted
    Success = 200,
    /// Command not allowed in the current state
    IllegalCommand = 2,
    /// Frame sent before login completed
    NotAuthenticated = 5,
    /// Auth token rejected
    InvalidToken = 9,
    /// Another login with this token is already active; treated as success
    AlreadyLoggedIn = 10,
    /// Local-only code used when no reply arrived
    Timeout = 16,
    /// Server failed to process the command
    ServerException = 19,
}

impl Status {
    /// Convert to u16
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            200 => Some(Self::Success),
            2 => Some(Self::IllegalCommand),
            5 => Some(Self::NotAuthenticated),
            9 => Some(Self::InvalidToken),
            10 => Some(Self::AlreadyLoggedIn),
            16 => Some(Self::Timeout),
            19 => Some(Self::ServerException),
            _ => None,
        }
    }

    /// Whether a login reply with this status opens the session
    pub fn is_login_accepted(&self) -> bool {
        matches!(self, Self::Success | Self::AlreadyLoggedIn)
    }
}
