//! Frame dispatch.
//!
//! Consumers receive a buffer from the transport, read its header and hand
//! it to the codec registered for the frame type. New frame types implement
//! [`FrameCodec`] and get a variant in [`Frame`].

use crate::address::Address;
use crate::broker_info::BrokerInfo;
use crate::error::{FrameError, Result};
use crate::header::{FrameFlags, FrameHeader, FrameType};
use crate::route_join::RouteJoin;
use crate::route_remove::RouteRemove;
use crate::route_setup::RouteSetup;
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Encode/decode pair for one frame type
pub trait FrameCodec: Sized {
    /// Type code written into the header
    const FRAME_TYPE: FrameType;

    /// Header flags carried by this value
    fn flags(&self) -> FrameFlags;

    /// Encode into a freshly allocated buffer, header included
    fn encode(&self) -> Bytes;

    /// Decode a complete frame, header included
    fn decode(buf: &[u8]) -> Result<Self>;
}

/// Any control-plane frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frame {
    /// ROUTE_SETUP
    RouteSetup(RouteSetup),
    /// ROUTE_JOIN
    RouteJoin(RouteJoin),
    /// ROUTE_REMOVE
    RouteRemove(RouteRemove),
    /// BROKER_INFO
    BrokerInfo(BrokerInfo),
    /// ADDRESS
    Address(Address),
}

impl Frame {
    /// Decode any supported frame, dispatching on the header's type
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let header = FrameHeader::decode(buf).inspect_err(|e| {
            debug!(len = buf.len(), error = %e, "rejecting frame header");
        })?;
        if !header.is_supported_version() {
            debug!(
                major = header.major_version,
                minor = header.minor_version,
                "rejecting frame with unsupported version"
            );
            return Err(FrameError::UnsupportedVersion {
                major: header.major_version,
                minor: header.minor_version,
            });
        }

        let frame = match header.frame_type {
            FrameType::RouteSetup => RouteSetup::decode(buf).map(Frame::RouteSetup),
            FrameType::RouteJoin => RouteJoin::decode(buf).map(Frame::RouteJoin),
            FrameType::RouteRemove => RouteRemove::decode(buf).map(Frame::RouteRemove),
            FrameType::BrokerInfo => BrokerInfo::decode(buf).map(Frame::BrokerInfo),
            FrameType::Address => Address::decode(buf).map(Frame::Address),
        };
        match &frame {
            Ok(_) => trace!(frame_type = %header.frame_type, len = buf.len(), "decoded frame"),
            Err(e) => {
                debug!(frame_type = %header.frame_type, error = %e, "failed to decode frame body")
            }
        }
        frame
    }

    /// Encode into a freshly allocated buffer
    pub fn encode(&self) -> Bytes {
        let buf = match self {
            Frame::RouteSetup(frame) => frame.encode(),
            Frame::RouteJoin(frame) => frame.encode(),
            Frame::RouteRemove(frame) => frame.encode(),
            Frame::BrokerInfo(frame) => frame.encode(),
            Frame::Address(frame) => frame.encode(),
        };
        trace!(frame_type = %self.frame_type(), len = buf.len(), "encoded frame");
        buf
    }

    /// Header frame type
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::RouteSetup(_) => RouteSetup::FRAME_TYPE,
            Frame::RouteJoin(_) => RouteJoin::FRAME_TYPE,
            Frame::RouteRemove(_) => RouteRemove::FRAME_TYPE,
            Frame::BrokerInfo(_) => BrokerInfo::FRAME_TYPE,
            Frame::Address(_) => Address::FRAME_TYPE,
        }
    }

    /// Header flags
    pub fn flags(&self) -> FrameFlags {
        match self {
            Frame::RouteSetup(frame) => frame.flags(),
            Frame::RouteJoin(frame) => frame.flags(),
            Frame::RouteRemove(frame) => frame.flags(),
            Frame::BrokerInfo(frame) => frame.flags(),
            Frame::Address(frame) => frame.flags(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::RouteSetup(frame) => fmt::Display::fmt(frame, f),
            Frame::RouteJoin(frame) => fmt::Display::fmt(frame, f),
            Frame::RouteRemove(frame) => fmt::Display::fmt(frame, f),
            Frame::BrokerInfo(frame) => fmt::Display::fmt(frame, f),
            Frame::Address(frame) => fmt::Display::fmt(frame, f),
        }
    }
}

macro_rules! impl_from_frame {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Frame {
                fn from(frame: $variant) -> Self {
                    Frame::$variant(frame)
                }
            }
        )+
    };
}

impl_from_frame!(RouteSetup, RouteJoin, RouteRemove, BrokerInfo, Address);
