//! Frame header processing for the wire protocol.
//!
//! Every frame opens with the same 4-byte preamble:
//!
//! ```text
//! +--------+--------+--------------------------+
//! | major  | minor  | type (6 bits) | flags(10)|
//! +--------+--------+--------------------------+
//!    u8       u8            u16 big-endian
//! ```

use crate::error::{FrameError, Result};
use bitflags::bitflags;
use bytes::{BufMut, BytesMut};
use serde::{Serialize, Serializer};
use std::fmt;

/// Major protocol version written by this build
pub const MAJOR_VERSION: u8 = 0;

/// Minor protocol version written by this build
pub const MINOR_VERSION: u8 = 1;

/// Frame header size in bytes
pub const FRAME_HEADER_SIZE: usize = 4;

const FRAME_TYPE_SHIFT: u16 = 10;
const FLAGS_MASK: u16 = 0x03FF;

/// Frame types as defined in the wire protocol
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameType {
    /// Route announcement from a connecting peer
    RouteSetup = 0x01,
    /// Route joined at a broker
    RouteJoin = 0x02,
    /// Route withdrawn from a broker
    RouteRemove = 0x03,
    /// Broker presence announcement
    BrokerInfo = 0x04,
    /// Addressable destination advertisement
    Address = 0x05,
}

impl FrameType {
    /// 6-bit wire code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Upper-case protocol name
    pub const fn name(self) -> &'static str {
        match self {
            FrameType::RouteSetup => "ROUTE_SETUP",
            FrameType::RouteJoin => "ROUTE_JOIN",
            FrameType::RouteRemove => "ROUTE_REMOVE",
            FrameType::BrokerInfo => "BROKER_INFO",
            FrameType::Address => "ADDRESS",
        }
    }
}

impl TryFrom<u8> for FrameType {
    type Error = FrameError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0x01 => Ok(FrameType::RouteSetup),
            0x02 => Ok(FrameType::RouteJoin),
            0x03 => Ok(FrameType::RouteRemove),
            0x04 => Ok(FrameType::BrokerInfo),
            0x05 => Ok(FrameType::Address),
            _ => Err(FrameError::UnknownFrameType(value)),
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Frame flags bitmask.
    ///
    /// The header carries 10 flag bits whose meaning is defined per frame
    /// type by the caller; the codec only enforces the width.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u16 {
        const _ = 0x03FF;
    }
}

impl FrameFlags {
    /// Build from raw bits, dropping anything above bit 9
    pub const fn from_raw(bits: u16) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl fmt::Display for FrameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#012b}", self.bits())
    }
}

impl Serialize for FrameFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol major version
    pub major_version: u8,
    /// Protocol minor version
    pub minor_version: u8,
    /// Frame type
    pub frame_type: FrameType,
    /// Frame flags
    pub flags: FrameFlags,
}

impl FrameHeader {
    /// Allocate a buffer holding the header, ready for the body to be appended
    pub fn encode(frame_type: FrameType, flags: FrameFlags, body_capacity: usize) -> BytesMut {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + body_capacity);
        buf.put_u8(MAJOR_VERSION);
        buf.put_u8(MINOR_VERSION);
        buf.put_u16(pack_type_and_flags(frame_type, flags));
        buf
    }

    /// Decode the header at the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let view = HeaderView::new(buf)?;
        Ok(Self {
            major_version: view.major_version(),
            minor_version: view.minor_version(),
            frame_type: view.frame_type()?,
            flags: view.flags(),
        })
    }

    /// Whether this build can decode frames with the header's version
    pub fn is_supported_version(&self) -> bool {
        self.major_version == MAJOR_VERSION
    }
}

fn pack_type_and_flags(frame_type: FrameType, flags: FrameFlags) -> u16 {
    (u16::from(frame_type.code()) << FRAME_TYPE_SHIFT) | (flags.bits() & FLAGS_MASK)
}

/// Flyweight over the header at the start of a frame buffer.
///
/// Accessors read straight from the buffer and can be called in any order.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    buf: &'a [u8],
}

impl<'a> HeaderView<'a> {
    /// Wrap `buf`, checking that a full header is present
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Err(FrameError::truncated(FRAME_HEADER_SIZE, buf.len()));
        }
        Ok(Self { buf })
    }

    /// Wrap `buf`, also checking that it holds a frame of the `expected` type
    pub fn expect(buf: &'a [u8], expected: FrameType) -> Result<Self> {
        let view = Self::new(buf)?;
        let actual = view.frame_type()?;
        if actual != expected {
            return Err(FrameError::UnexpectedFrameType { expected, actual });
        }
        Ok(view)
    }

    /// Protocol major version
    pub fn major_version(&self) -> u8 {
        self.buf[0]
    }

    /// Protocol minor version
    pub fn minor_version(&self) -> u8 {
        self.buf[1]
    }

    /// Frame type, failing on unregistered codes
    pub fn frame_type(&self) -> Result<FrameType> {
        FrameType::try_from((self.type_and_flags() >> FRAME_TYPE_SHIFT) as u8)
    }

    /// Frame flags
    pub fn flags(&self) -> FrameFlags {
        FrameFlags::from_bits_retain(self.type_and_flags() & FLAGS_MASK)
    }

    /// Frame buffer, header included
    pub fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    fn type_and_flags(&self) -> u16 {
        u16::from_be_bytes([self.buf[2], self.buf[3]])
    }
}
