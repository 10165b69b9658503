//! Protocol error types

use thiserror::Error;

/// Errors that can occur while reading or writing frames
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Fewer header bytes were delivered than a full header needs
    #[error("Incomplete header: expected {expected} bytes, got {actual}")]
    IncompleteHeader { expected: usize, actual: usize },

    /// Fewer body bytes were delivered than the header declared
    #[error("Short body: expected {expected} bytes, got {actual}")]
    ShortBody { expected: usize, actual: usize },

    /// Declared body length exceeds the configured maximum
    #[error("Packet size ({size}) > max allowed ({max})")]
    BodyTooLarge { size: usize, max: usize },

    /// Command code not valid in this direction
    #[error("Invalid header type: {0}")]
    UnknownCommand(u8),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_messages() {
        let err = ProtocolError::BodyTooLarge { size: 300, max: 256 };
        assert_eq!(err.to_string(), "Packet size (300) > max allowed (256)");
        assert_eq!(
            ProtocolError::UnknownCommand(99).to_string(),
            "Invalid header type: 99"
        );
    }
}
