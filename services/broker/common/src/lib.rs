//! Shared value types for the routing broker.
//!
//! - [`Id`]: 128-bit broker and route identifiers
//! - [`Key`], [`WellKnownKey`]: tag keys, compact registry codes or free-form names
//! - [`Tag`], [`Tags`]: canonical, sorted and deduplicated metadata sets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod id;
pub mod key;
pub mod tags;

pub use id::{Id, ParseIdError, ID_SIZE};
pub use key::{Key, WellKnownKey};
pub use tags::{Tag, Tags, TagsBuilder};
