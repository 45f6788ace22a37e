//! ROUTE_JOIN frame: a route joined at a broker.
//!
//! ```text
//! [header 4B][broker id 16B][route id 16B][timestamp i64][service name][tag set]
//! ```

use crate::codec::{put_str, str_len, WireReader};
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::header::{FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE};
use crate::tags::{decode_tags, encode_tags, encoded_len};
use broker_common::{Id, Tags, ID_SIZE};
use bytes::{BufMut, Bytes};
use serde::Serialize;
use std::fmt;

const BROKER_ID_OFFSET: usize = FRAME_HEADER_SIZE;
const ROUTE_ID_OFFSET: usize = BROKER_ID_OFFSET + ID_SIZE;
const TIMESTAMP_OFFSET: usize = ROUTE_ID_OFFSET + ID_SIZE;
const SERVICE_NAME_OFFSET: usize = TIMESTAMP_OFFSET + 8;

/// Owned ROUTE_JOIN frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteJoin {
    /// Broker the route joined
    pub broker_id: Id,
    /// Joining route
    pub route_id: Id,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Service the route provides
    pub service_name: String,
    /// Route tags
    pub tags: Tags,
    /// Header flags
    pub flags: FrameFlags,
}

impl RouteJoin {
    /// Create a route join frame value
    pub fn new(
        broker_id: Id,
        route_id: Id,
        timestamp: i64,
        service_name: impl Into<String>,
        tags: Tags,
        flags: FrameFlags,
    ) -> Self {
        Self {
            broker_id,
            route_id,
            timestamp,
            service_name: service_name.into(),
            tags,
            flags,
        }
    }
}

impl FrameCodec for RouteJoin {
    const FRAME_TYPE: FrameType = FrameType::RouteJoin;

    fn flags(&self) -> FrameFlags {
        self.flags
    }

    fn encode(&self) -> Bytes {
        let body = 2 * ID_SIZE + 8 + str_len(&self.service_name) + encoded_len(&self.tags);
        let mut buf = FrameHeader::encode(Self::FRAME_TYPE, self.flags, body);
        self.broker_id.encode(&mut buf);
        self.route_id.encode(&mut buf);
        buf.put_i64(self.timestamp);
        put_str(&mut buf, &self.service_name);
        encode_tags(&mut buf, &self.tags);
        buf.freeze()
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let view = RouteJoinView::new(buf)?;
        Ok(Self {
            broker_id: view.broker_id()?,
            route_id: view.route_id()?,
            timestamp: view.timestamp()?,
            service_name: view.service_name()?.to_string(),
            tags: view.tags()?,
            flags: view.flags(),
        })
    }
}

impl fmt::Display for RouteJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ROUTE_JOIN flags={} broker_id={} route_id={} timestamp={} service_name={:?} tags={}",
            self.flags, self.broker_id, self.route_id, self.timestamp, self.service_name, self.tags
        )
    }
}

/// Flyweight over an encoded ROUTE_JOIN frame
#[derive(Debug, Clone, Copy)]
pub struct RouteJoinView<'a> {
    header: HeaderView<'a>,
}

impl<'a> RouteJoinView<'a> {
    /// Wrap `buf`, checking the header
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Ok(Self {
            header: HeaderView::expect(buf, FrameType::RouteJoin)?,
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

    /// Broker the route joined
    pub fn broker_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), BROKER_ID_OFFSET)?.read_id()
    }

    /// Joining route
    pub fn route_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), ROUTE_ID_OFFSET)?.read_id()
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> Result<i64> {
        WireReader::at(self.header.as_bytes(), TIMESTAMP_OFFSET)?.read_i64()
    }

    /// Service name, borrowed from the frame buffer
    pub fn service_name(&self) -> Result<&'a str> {
        WireReader::at(self.header.as_bytes(), SERVICE_NAME_OFFSET)?.read_str()
    }

    /// Route tags
    pub fn tags(&self) -> Result<Tags> {
        let mut reader = WireReader::at(self.header.as_bytes(), SERVICE_NAME_OFFSET)?;
        reader.skip_str()?;
        decode_tags(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use broker_common::WellKnownKey;

    #[test]
    fn test_encode_decode() {
        let broker_id = Id::random();
        let route_id = Id::random();
        let timestamp = 1_700_000_000_456;
        let tags = Tags::builder()
            .with(WellKnownKey::MajorVersion, "1")
            .with(WellKnownKey::MinorVersion, "0")
            .with("mycustomtag", "mycustomtagvalue")
            .build();

        let encoded = RouteJoin::new(
            broker_id,
            route_id,
            timestamp,
            "myService",
            tags.clone(),
            FrameFlags::empty(),
        )
        .encode();

        let view = RouteJoinView::new(&encoded).unwrap();
        assert_eq!(view.header().frame_type().unwrap(), FrameType::RouteJoin);
        assert_eq!(view.broker_id().unwrap(), broker_id);
        assert_eq!(view.route_id().unwrap(), route_id);
        assert_eq!(view.timestamp().unwrap(), timestamp);
        assert_eq!(view.service_name().unwrap(), "myService");
        assert_eq!(view.tags().unwrap(), tags);
    }

    #[test]
    fn test_empty_service_name() {
        let frame = RouteJoin::new(
            Id::from_parts(1, 1),
            Id::from_parts(2, 2),
            0,
            "",
            Tags::builder().with(WellKnownKey::Zone, "a").build(),
            FrameFlags::from_raw(3),
        );
        assert_eq!(RouteJoin::decode(&frame.encode()).unwrap(), frame);
    }

    #[test]
    fn test_multibyte_service_name() {
        let frame = RouteJoin::new(
            Id::random(),
            Id::random(),
            42,
            "s\u{e9}rvice-\u{1F680}",
            Tags::empty().clone(),
            FrameFlags::empty(),
        );
        let encoded = frame.encode();
        assert_eq!(
            RouteJoinView::new(&encoded).unwrap().service_name().unwrap(),
            frame.service_name
        );
    }

    #[test]
    fn test_service_name_length_past_end() {
        let mut encoded = RouteJoin::new(
            Id::random(),
            Id::random(),
            0,
            "abc",
            Tags::empty().clone(),
            FrameFlags::empty(),
        )
        .encode()
        .to_vec();
        encoded[SERVICE_NAME_OFFSET] = 0x7F;

        let view = RouteJoinView::new(&encoded).unwrap();
        assert!(matches!(
            view.service_name(),
            Err(FrameError::InvalidEncoding(_))
        ));
        assert!(view.tags().is_err());
        assert!(view.route_id().is_ok());
    }
}
