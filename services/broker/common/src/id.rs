//! 128-bit identifiers for brokers and routes.

use bytes::BufMut;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Encoded size of an [`Id`] in bytes
pub const ID_SIZE: usize = 16;

/// Opaque 128-bit identifier naming a broker or a route.
///
/// On the wire an id is the high half followed by the low half, both
/// big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id {
    high: u64,
    low: u64,
}

/// Error returned when parsing an [`Id`] from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// Input is not exactly 32 characters long
    #[error("id must be 32 hex digits, got {0} characters")]
    Length(usize),

    /// Input contains a non-hex character
    #[error("invalid hex digit in id")]
    Digit,
}

impl Id {
    /// Create an id from a uniformly random 128-bit value
    pub fn random() -> Self {
        Self {
            high: rand::random(),
            low: rand::random(),
        }
    }

    /// Create an id from its two 64-bit halves
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Most significant 64 bits
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Least significant 64 bits
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Big-endian byte representation
    pub fn to_bytes(&self) -> [u8; ID_SIZE] {
        let mut out = [0u8; ID_SIZE];
        out[..8].copy_from_slice(&self.high.to_be_bytes());
        out[8..].copy_from_slice(&self.low.to_be_bytes());
        out
    }

    /// Rebuild an id from its big-endian byte representation
    pub fn from_bytes(bytes: [u8; ID_SIZE]) -> Self {
        let (high, low) = bytes.split_at(8);
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(high);
        lo.copy_from_slice(low);
        Self {
            high: u64::from_be_bytes(hi),
            low: u64::from_be_bytes(lo),
        }
    }

    /// Append the 16-byte wire form to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64(self.high);
        buf.put_u64(self.low);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}

impl fmt::LowerHex for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseIdError::Length(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseIdError::Digit);
        }
        let high = u64::from_str_radix(&s[..16], 16).map_err(|_| ParseIdError::Digit)?;
        let low = u64::from_str_radix(&s[16..], 16).map_err(|_| ParseIdError::Digit)?;
        Ok(Self { high, low })
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
