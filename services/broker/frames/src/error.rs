//! Frame codec error types.

use crate::header::FrameType;
use thiserror::Error;

/// Errors raised while decoding a frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes remain than a fixed-width field needs
    #[error("truncated buffer: need {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        /// Bytes required by the field
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Header carries a frame type code with no registered type
    #[error("unknown frame type {0:#04x}")]
    UnknownFrameType(u8),

    /// Buffer holds a different frame type than the view expects
    #[error("unexpected frame type: expected {expected:?}, got {actual:?}")]
    UnexpectedFrameType {
        /// Type the caller asked for
        expected: FrameType,
        /// Type found in the header
        actual: FrameType,
    },

    /// Major version not understood by this build
    #[error("unsupported protocol version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version from the header
        major: u8,
        /// Minor version from the header
        minor: u8,
    },

    /// Bad varint, string length, or UTF-8
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Tag-set block is inconsistent with the bytes that follow it
    #[error("malformed tag set: {0}")]
    MalformedTagSet(String),
}

impl FrameError {
    /// Create a truncated buffer error
    #[inline]
    pub fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedBuffer { needed, remaining }
    }

    /// Create an invalid encoding error
    #[inline]
    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding(reason.into())
    }

    /// Create a malformed tag set error
    #[inline]
    pub fn malformed_tags(reason: impl Into<String>) -> Self {
        Self::MalformedTagSet(reason.into())
    }
}

/// Result alias for frame decoding
pub type Result<T> = std::result::Result<T, FrameError>;
