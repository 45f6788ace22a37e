//! BROKER_INFO frame: announces a broker's presence.
//!
//! ```text
//! [header 4B][broker id 16B][timestamp i64][tag set]
//! ```

use crate::codec::WireReader;
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::header::{FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE};
use crate::tags::{decode_tags, encode_tags, encoded_len};
use broker_common::{Id, Tags, ID_SIZE};
use bytes::{BufMut, Bytes};
use serde::Serialize;
use std::fmt;

const BROKER_ID_OFFSET: usize = FRAME_HEADER_SIZE;
const TIMESTAMP_OFFSET: usize = BROKER_ID_OFFSET + ID_SIZE;
const TAGS_OFFSET: usize = TIMESTAMP_OFFSET + 8;

/// Owned BROKER_INFO frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerInfo {
    /// Announcing broker
    pub broker_id: Id,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Broker tags
    pub tags: Tags,
    /// Header flags
    pub flags: FrameFlags,
}

impl BrokerInfo {
    /// Create a broker info frame value
    pub fn new(broker_id: Id, timestamp: i64, tags: Tags, flags: FrameFlags) -> Self {
        Self {
            broker_id,
            timestamp,
            tags,
            flags,
        }
    }
}

impl FrameCodec for BrokerInfo {
    const FRAME_TYPE: FrameType = FrameType::BrokerInfo;

    fn flags(&self) -> FrameFlags {
        self.flags
    }

    fn encode(&self) -> Bytes {
        let body = ID_SIZE + 8 + encoded_len(&self.tags);
        let mut buf = FrameHeader::encode(Self::FRAME_TYPE, self.flags, body);
        self.broker_id.encode(&mut buf);
        buf.put_i64(self.timestamp);
        encode_tags(&mut buf, &self.tags);
        buf.freeze()
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let view = BrokerInfoView::new(buf)?;
        Ok(Self {
            broker_id: view.broker_id()?,
            timestamp: view.timestamp()?,
            tags: view.tags()?,
            flags: view.flags(),
        })
    }
}

impl fmt::Display for BrokerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BROKER_INFO flags={} broker_id={} timestamp={} tags={}",
            self.flags, self.broker_id, self.timestamp, self.tags
        )
    }
}

/// Flyweight over an encoded BROKER_INFO frame
#[derive(Debug, Clone, Copy)]
pub struct BrokerInfoView<'a> {
    header: HeaderView<'a>,
}

impl<'a> BrokerInfoView<'a> {
    /// Wrap `buf`, checking the header
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Ok(Self {
            header: HeaderView::expect(buf, FrameType::BrokerInfo)?,
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

    /// Announcing broker
    pub fn broker_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), BROKER_ID_OFFSET)?.read_id()
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> Result<i64> {
        WireReader::at(self.header.as_bytes(), TIMESTAMP_OFFSET)?.read_i64()
    }

    /// Broker tags
    pub fn tags(&self) -> Result<Tags> {
        decode_tags(&mut WireReader::at(self.header.as_bytes(), TAGS_OFFSET)?)
    }
}
