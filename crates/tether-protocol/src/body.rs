//! Zero-terminated frame body
//!
//! Bodies are read into a buffer one byte longer than the declared length and
//! the extra byte is set to zero, so textual payloads can be used as C strings
//! without copying.

use std::ffi::CStr;

/// Borrowed view over a received body and its trailing zero byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body<'a> {
    raw: &'a [u8],
}

impl<'a> Body<'a> {
    /// Wrap a buffer whose last byte is the zero terminator
    ///
    /// Returns None if the buffer is empty or not zero-terminated.
    pub fn from_nul_terminated(raw: &'a [u8]) -> Option<Self> {
        match raw.last() {
            Some(0) => Some(Self { raw }),
            _ => None,
        }
    }

    /// Declared body bytes, without the terminator
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.raw[..self.raw.len() - 1]
    }

    /// Body bytes including the terminator
    pub fn as_bytes_with_nul(&self) -> &'a [u8] {
        self.raw
    }

    /// Body up to its first zero byte
    pub fn as_c_str(&self) -> &'a CStr {
        // The terminator guarantees a zero byte is present.
        CStr::from_bytes_until_nul(self.raw).unwrap_or_default()
    }

    /// Declared body length
    pub fn len(&self) -> usize {
        self.raw.len() - 1
    }

    /// Whether the declared body is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the zero-separated parameters of the payload
    pub fn params(&self) -> impl Iterator<Item = &'a [u8]> {
        let bytes = self.as_bytes();
        let empty = bytes.is_empty();
        bytes.split(|b| *b == 0).filter(move |_| !empty)
    }
}
