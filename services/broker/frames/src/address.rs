//! ADDRESS frame: advertises an addressable destination.
//!
//! ```text
//! [header 4B][origin route id 16B][metadata tag set][tag set]
//! ```

use crate::codec::WireReader;
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::header::{FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE};
use crate::tags::{decode_tags, encode_tags, encoded_len, skip_tags};
use broker_common::{Id, Tags, ID_SIZE};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

const ORIGIN_ROUTE_ID_OFFSET: usize = FRAME_HEADER_SIZE;
const METADATA_OFFSET: usize = ORIGIN_ROUTE_ID_OFFSET + ID_SIZE;

/// Owned ADDRESS frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Route that originated the address
    pub origin_route_id: Id,
    /// Metadata tags
    pub metadata: Tags,
    /// Address tags
    pub tags: Tags,
    /// Header flags
    pub flags: FrameFlags,
}

impl Address {
    /// Create an address frame value
    pub fn new(origin_route_id: Id, metadata: Tags, tags: Tags, flags: FrameFlags) -> Self {
        Self {
            origin_route_id,
            metadata,
            tags,
            flags,
        }
    }
}

impl FrameCodec for Address {
    const FRAME_TYPE: FrameType = FrameType::Address;

    fn flags(&self) -> FrameFlags {
        self.flags
    }

    fn encode(&self) -> Bytes {
        let body = ID_SIZE + encoded_len(&self.metadata) + encoded_len(&self.tags);
        let mut buf = FrameHeader::encode(Self::FRAME_TYPE, self.flags, body);
        self.origin_route_id.encode(&mut buf);
        encode_tags(&mut buf, &self.metadata);
        encode_tags(&mut buf, &self.tags);
        buf.freeze()
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let view = AddressView::new(buf)?;
        Ok(Self {
            origin_route_id: view.origin_route_id()?,
            metadata: view.metadata()?,
            tags: view.tags()?,
            flags: view.flags(),
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ADDRESS flags={} origin_route_id={} metadata={} tags={}",
            self.flags, self.origin_route_id, self.metadata, self.tags
        )
    }
}

/// Flyweight over an encoded ADDRESS frame
#[derive(Debug, Clone, Copy)]
pub struct AddressView<'a> {
    header: HeaderView<'a>,
}

impl<'a> AddressView<'a> {
    /// Wrap `buf`, checking the header
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Ok(Self {
            header: HeaderView::expect(buf, FrameType::Address)?,
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

    /// Route that originated the address
    pub fn origin_route_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), ORIGIN_ROUTE_ID_OFFSET)?.read_id()
    }

    /// Metadata tags, the first tag-set block
    pub fn metadata(&self) -> Result<Tags> {
        let mut reader = WireReader::at(self.header.as_bytes(), METADATA_OFFSET)?;
        decode_tags(&mut reader)
    }

    /// Address tags, the block after the metadata
    pub fn tags(&self) -> Result<Tags> {
        let mut reader = WireReader::at(self.header.as_bytes(), METADATA_OFFSET)?;
        skip_tags(&mut reader)?;
        decode_tags(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use broker_common::WellKnownKey;

    fn tags() -> Tags {
        Tags::builder()
            .with(WellKnownKey::MajorVersion, "1")
            .with(WellKnownKey::MinorVersion, "0")
            .with("mycustomtag", "mycustomtagvalue")
            .build()
    }

    fn assert_address(metadata: Tags, tags: Tags, flags: u16) {
        let origin_route_id = Id::random();
        let frame = Address::new(
            origin_route_id,
            metadata.clone(),
            tags.clone(),
            FrameFlags::from_raw(flags),
        );
        let encoded = frame.encode();

        let header = HeaderView::new(&encoded).unwrap();
        assert_eq!(header.flags().bits(), flags);
        assert_eq!(header.frame_type().unwrap(), FrameType::Address);

        let view = AddressView::new(&encoded).unwrap();
        assert_eq!(view.origin_route_id().unwrap(), origin_route_id);
        assert_eq!(view.metadata().unwrap(), metadata);
        assert_eq!(view.tags().unwrap(), tags);

        assert_eq!(Address::decode(&encoded).unwrap(), frame);
    }

    #[test]
    fn test_encode_decode() {
        let metadata = Tags::builder()
            .with("mycustommetadata", "mycustommetadatavalue")
            .build();
        assert_address(metadata, tags(), 0b01_0100_0000);
    }

    #[test]
    fn test_encode_decode_empty_metadata() {
        assert_address(Tags::empty().clone(), tags(), 0b00_1000_0000);
    }

    #[test]
    fn test_encode_decode_all_empty() {
        assert_address(Tags::empty().clone(), Tags::empty().clone(), 0);
    }

    #[test]
    fn test_fixed_route_id_scenario() {
        let origin_route_id = Id::from_parts(0x0123_4567_89AB_CDEF, 0xFEDC_BA98_7654_3210);
        let frame = Address::new(
            origin_route_id,
            Tags::empty().clone(),
            tags(),
            FrameFlags::from_raw(0b00_1000_0000),
        );
        let decoded = Address::decode(&frame.encode()).unwrap();

        assert_eq!(decoded.origin_route_id, origin_route_id);
        assert_eq!(decoded.flags.bits(), 0b00_1000_0000);
        assert!(decoded.metadata.is_empty());
        let keys: Vec<_> = decoded.tags.iter().map(|t| t.key().name()).collect();
        assert_eq!(
            keys,
            vec![
                "io.rsocket.routing.MajorVersion",
                "io.rsocket.routing.MinorVersion",
                "mycustomtag",
            ]
        );
    }

    #[test]
    fn test_view_rejects_other_frame_type() {
        let buf = FrameHeader::encode(FrameType::BrokerInfo, FrameFlags::empty(), 0);
        assert!(matches!(
            AddressView::new(&buf),
            Err(FrameError::UnexpectedFrameType { .. })
        ));
    }

    #[test]
    fn test_truncated_body() {
        let encoded = Address::new(Id::random(), tags(), tags(), FrameFlags::empty()).encode();

        let short = &encoded[..METADATA_OFFSET - 1];
        let view = AddressView::new(short).unwrap();
        assert_eq!(
            view.origin_route_id(),
            Err(FrameError::truncated(ID_SIZE, ID_SIZE - 1))
        );

        for len in METADATA_OFFSET..encoded.len() {
            assert!(Address::decode(&encoded[..len]).is_err(), "len {len}");
        }
    }
}
