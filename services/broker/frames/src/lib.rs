//! Control-plane frame codecs for the routing broker.
//!
//! Brokers and connecting peers exchange small binary frames to announce
//! broker presence, join and leave routes, and advertise addressable
//! destinations. Each codec writes straight into a `BytesMut` on encode and
//! reads straight from the borrowed buffer on decode: the `*View` flyweights
//! recompute field offsets on every accessor call and never copy the frame.
//! The owned frame values decode once through the same views when the caller
//! wants a structured value instead.
//!
//! ## Wire Format
//!
//! ```text
//! +----------------------+----------------------------+
//! | u8 major_version     | protocol build constant    |
//! +----------------------+----------------------------+
//! | u8 minor_version     | protocol build constant    |
//! +----------------------+----------------------------+
//! | u16 type | flags     | 6-bit type, 10-bit flags   |
//! +----------------------+----------------------------+
//! | fixed fields         | ids (16B), timestamps (8B) |
//! +----------------------+----------------------------+
//! | variable fields      | strings, tag-set blocks    |
//! +----------------------+----------------------------+
//! ```
//!
//! All integers are big-endian; string lengths and tag counts are varints.
//! Buffers arrive from and leave for the transport as whole frames, one
//! buffer per frame.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod broker_info;
pub mod codec;
pub mod error;
pub mod frame;
pub mod header;
pub mod route_join;
pub mod route_remove;
pub mod route_setup;
pub mod tags;

// Re-export main types
pub use address::{Address, AddressView};
pub use broker_info::{BrokerInfo, BrokerInfoView};
pub use codec::WireReader;
pub use error::{FrameError, Result};
pub use frame::{Frame, FrameCodec};
pub use header::{
    FrameFlags, FrameHeader, FrameType, HeaderView, FRAME_HEADER_SIZE, MAJOR_VERSION,
    MINOR_VERSION,
};
pub use route_join::{RouteJoin, RouteJoinView};
pub use route_remove::{RouteRemove, RouteRemoveView};
pub use route_setup::{RouteSetup, RouteSetupView};

pub use broker_common::{Id, Key, Tag, Tags, TagsBuilder, WellKnownKey};
