//! ROUTE_SETUP frame: a connecting peer announces a route.
//!
//! ```text
//! [header 4B][route id 16B][service name][tag set]
//! ```

use crate::codec::{put_str, str_len, WireReader};
use crate::error::Result;
use crate::frame::FrameCodec;
use crate::header::{FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE};
use crate::tags::{decode_tags, encode_tags, encoded_len};
use broker_common::{Id, Tags, ID_SIZE};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

const ROUTE_ID_OFFSET: usize = FRAME_HEADER_SIZE;
const SERVICE_NAME_OFFSET: usize = ROUTE_ID_OFFSET + ID_SIZE;

/// Owned ROUTE_SETUP frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSetup {
    /// Route being set up
    pub route_id: Id,
    /// Service the route provides
    pub service_name: String,
    /// Route tags
    pub tags: Tags,
    /// Header flags
    pub flags: FrameFlags,
}

impl RouteSetup {
    /// Create a route setup frame value
    pub fn new(
        route_id: Id,
        service_name: impl Into<String>,
        tags: Tags,
        flags: FrameFlags,
    ) -> Self {
        Self {
            route_id,
            service_name: service_name.into(),
            tags,
            flags,
        }
    }
}

impl FrameCodec for RouteSetup {
    const FRAME_TYPE: FrameType = FrameType::RouteSetup;

    fn flags(&self) -> FrameFlags {
        self.flags
    }

    fn encode(&self) -> Bytes {
        let body = ID_SIZE + str_len(&self.service_name) + encoded_len(&self.tags);
        let mut buf = FrameHeader::encode(Self::FRAME_TYPE, self.flags, body);
        self.route_id.encode(&mut buf);
        put_str(&mut buf, &self.service_name);
        encode_tags(&mut buf, &self.tags);
        buf.freeze()
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        let view = RouteSetupView::new(buf)?;
        Ok(Self {
            route_id: view.route_id()?,
            service_name: view.service_name()?.to_string(),
            tags: view.tags()?,
            flags: view.flags(),
        })
    }
}

impl fmt::Display for RouteSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ROUTE_SETUP flags={} route_id={} service_name={:?} tags={}",
            self.flags, self.route_id, self.service_name, self.tags
        )
    }
}

/// Flyweight over an encoded ROUTE_SETUP frame
#[derive(Debug, Clone, Copy)]
pub struct RouteSetupView<'a> {
    header: HeaderView<'a>,
}

impl<'a> RouteSetupView<'a> {
    /// Wrap `buf`, checking the header
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Ok(Self {
            header: HeaderView::expect(buf, FrameType::RouteSetup)?,
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

    /// Route being set up
    pub fn route_id(&self) -> Result<Id> {
        WireReader::at(self.header.as_bytes(), ROUTE_ID_OFFSET)?.read_id()
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
