//! ROUTE_REMOVE frame: a route withdrawn from a broker.
//!
//! ```text
//! [header 4B][broker id 16B][route id 16B][timestamp i64]
//! ```

use crate::codec::WireReader;
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::header::{FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE};
use broker_common::{Id, ID_SIZE};
use bytes::{BufMut, Bytes};
use serde::Serialize;
use std::fmt;

const BROKER_ID_OFFSET: usize = FRAME_HEADER_SIZE;
const ROUTE_ID_OFFSET: usize = BROKER_ID_OFFSET + ID_SIZE;
const TIMESTAMP_OFFSET: usize = ROUTE_ID_OFFSET + ID_SIZE;
const BODY_SIZE: usize = 2 * ID_SIZE + 8;

/// Owned ROUTE_REMOVE frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteRemove {
    /// Broker the route left
    pub broker_id: Id,
    /// Withdrawn route
    pub route_id: Id,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Header flags
    pub flags: FrameFlags,
}

impl RouteRemove {
    /// Create a route remove frame value
    pub fn new(broker_id: Id, route_id: Id, timestamp: i64, flags: FrameFlags) -> Self {
        Self {
            broker_id,
            route_id,
            timestamp,
            flags,
        }
    }
}

impl FrameCodec for RouteRemove {
    const FRAME_TYPE: FrameType = FrameType::RouteRemove;

    fn flags(&self) -> FrameFlags {
        self.flags
    }

    fn encode(&self) -> Bytes {
        let mut buf = FrameHeader::encode(Self::FRAME_TYPE, self.flags, BODY_SIZE);
        self.broker_id.encode(&mut buf);
        self.route_id.encode(&mut buf);
        buf.put_i64(self.timestamp);
        buf.freeze()
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let view = RouteRemoveView::new(buf)?;
        Ok(Self {
            broker_id: view.broker_id()?,
            route_id: view.route_id()?,
            timestamp: view.timestamp()?,
            flags: view.flags(),
        })
    }
}

impl fmt::Display for RouteRemove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ROUTE_REMOVE flags={} broker_id={} route_id={} timestamp={}",
            self.flags, self.broker_id, self.route_id, self.timestamp
        )
    }
}

/// Flyweight over an encoded ROUTE_REMOVE frame
#[derive(Debug, Clone, Copy)]
pub struct RouteRemoveView<'a> {
    header: HeaderView<'a>,
}

impl<'a> RouteRemoveView<'a> {
    /// Wrap `buf`, checking the header
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Ok(Self {
            header: HeaderView::expect(buf, FrameType::RouteRemove)?,
        })
    }

    /// Frame header
    pub fn header(&self) -> HeaderView<'a> {
        self.header
    }

    /// Header flags
    pub fn flags(&self) -> FrameFlags {
        self.header.flags()
    }

    /// Broker the route left
    pub fn broker_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), BROKER_ID_OFFSET)?.read_id()
    }

    /// Withdrawn route
    pub fn route_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), ROUTE_ID_OFFSET)?.read_id()
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> Result<i64> {
        WireReader::at(self.header.as_bytes(), TIMESTAMP_OFFSET)?.read_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn test_encode_decode() {
        let frame = RouteRemove::new(Id::random(), Id::random(), 99, FrameFlags::empty());
        let encoded = frame.encode();
        assert_eq!(encoded.len(), FRAME_HEADER_SIZE + BODY_SIZE);
        assert_eq!(RouteRemove::decode(&encoded).unwrap(), frame);
    }

    #[test]
    fn test_truncated() {
        let encoded =
            RouteRemove::new(Id::random(), Id::random(), 99, FrameFlags::empty()).encode();
        assert_eq!(
            RouteRemove::decode(&encoded[..encoded.len() - 1]),
            Err(FrameError::truncated(8, 7))
        );
        assert_eq!(
            RouteRemove::decode(&encoded[..2]),
            Err(FrameError::truncated(FRAME_HEADER_SIZE, 2))
        );
    }
}
