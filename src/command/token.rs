//! Bounded ASCII token carried on the button characteristic.

use crate::config::{PAYLOAD_CAPACITY, TOKEN_MAX_LEN};
use crate::error::TokenError;
use heapless::{String, Vec};

/// Text of the presence sentinel.
pub const IDLE_TOKEN: &str = "!";

/// A short printable-ASCII command identifier as carried on the button
/// characteristic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String<TOKEN_MAX_LEN>);

impl Token {
    pub fn new(text: &str) -> Result<Self, TokenError> {
        if text.is_empty() {
            return Err(TokenError::Empty);
        }
        if !text.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(TokenError::NotAscii);
        }
        let mut s = String::new();
        s.push_str(text).map_err(|_| TokenError::TooLong)?;
        Ok(Self(s))
    }

    /// Parse a raw characteristic value. Surrounding ASCII whitespace is
    /// ignored; everything else must be printable ASCII.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TokenError> {
        let trimmed = raw.trim_ascii();
        if trimmed.is_empty() {
            return Err(TokenError::Empty);
        }
        let text = core::str::from_utf8(trimmed).map_err(|_| TokenError::NotAscii)?;
        Self::new(text)
    }

    pub fn idle() -> Self {
        let mut s = String::new();
        let _ = s.push_str(IDLE_TOKEN);
        Self(s)
    }

    pub fn is_idle(&self) -> bool {
        self.0 == IDLE_TOKEN
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Bytes to put into the characteristic value.
    pub fn to_payload(&self) -> Vec<u8, PAYLOAD_CAPACITY> {
        // TOKEN_MAX_LEN < PAYLOAD_CAPACITY
        let mut v = Vec::new();
        let _ = v.extend_from_slice(self.as_bytes());
        v
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Token {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
