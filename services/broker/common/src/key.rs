//! Tag keys: a fixed registry of well-known keys plus arbitrary custom keys.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

macro_rules! well_known_keys {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// Registry of well-known tag keys with compact 7-bit wire codes
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum WellKnownKey {
            $($(#[$doc])* $variant = $code,)+
        }

        impl WellKnownKey {
            /// Every registered key, in code order
            pub const ALL: &'static [WellKnownKey] = &[$(WellKnownKey::$variant,)+];

            /// Canonical key name
            pub const fn name(self) -> &'static str {
                match self {
                    $(WellKnownKey::$variant => $name,)+
                }
            }

            /// Look up a key by its wire code
            pub const fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(WellKnownKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

well_known_keys! {
    /// Logical service a route belongs to
    ServiceName = 0x01 => "io.rsocket.routing.ServiceName",
    /// Route identifier
    RouteId = 0x02 => "io.rsocket.routing.RouteId",
    /// Instance name of the connecting peer
    InstanceName = 0x03 => "io.rsocket.routing.InstanceName",
    /// Broker cluster name
    ClusterName = 0x04 => "io.rsocket.routing.ClusterName",
    /// Infrastructure provider
    Provider = 0x05 => "io.rsocket.routing.Provider",
    /// Region
    Region = 0x06 => "io.rsocket.routing.Region",
    /// Availability zone
    Zone = 0x07 => "io.rsocket.routing.Zone",
    /// Device type
    Device = 0x08 => "io.rsocket.routing.Device",
    /// Operating system
    Os = 0x09 => "io.rsocket.routing.OS",
    /// User name
    UserName = 0x0A => "io.rsocket.routing.UserName",
    /// User id
    UserId = 0x0B => "io.rsocket.routing.UserId",
    /// Major version
    MajorVersion = 0x0C => "io.rsocket.routing.MajorVersion",
    /// Minor version
    MinorVersion = 0x0D => "io.rsocket.routing.MinorVersion",
    /// Patch version
    PatchVersion = 0x0E => "io.rsocket.routing.PatchVersion",
    /// Full version string
    Version = 0x0F => "io.rsocket.routing.Version",
    /// Deployment environment
    Environment = 0x10 => "io.rsocket.routing.Environment",
    /// Test cell
    TestCell = 0x11 => "io.rsocket.routing.TestCell",
    /// DNS name
    Dns = 0x12 => "io.rsocket.routing.DNS",
    /// IPv4 address
    Ipv4 = 0x13 => "io.rsocket.routing.IPv4",
    /// IPv6 address
    Ipv6 = 0x14 => "io.rsocket.routing.IPv6",
    /// Country
    Country = 0x15 => "io.rsocket.routing.Country",
    /// Time zone
    TimeZone = 0x1A => "io.rsocket.routing.TimeZone",
    /// Shard key
    ShardKey = 0x1B => "io.rsocket.routing.ShardKey",
    /// Shard method
    ShardMethod = 0x1C => "io.rsocket.routing.ShardMethod",
    /// Sticky route key
    StickyRouteKey = 0x1D => "io.rsocket.routing.StickyRouteKey",
    /// Load-balancing method
    LbMethod = 0x1E => "io.rsocket.routing.LBMethod",
}

impl WellKnownKey {
    /// Wire code (fits in 7 bits)
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a key by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

impl fmt::Display for WellKnownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tag key, either from the well-known registry or an arbitrary string.
///
/// Keys order by name so both variants interleave deterministically. A custom
/// key spelled exactly like a registry name is still a distinct key; it sorts
/// right after its well-known twin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Registered key carried as a one-byte code
    WellKnown(WellKnownKey),
    /// Arbitrary key carried as a length-prefixed string
    Custom(String),
}

impl Key {
    /// Create a custom key
    pub fn custom(name: impl Into<String>) -> Self {
        Key::Custom(name.into())
    }

    /// Name used for ordering and display
    pub fn name(&self) -> &str {
        match self {
            Key::WellKnown(key) => key.name(),
            Key::Custom(name) => name,
        }
    }

    /// Registry entry, if this is a well-known key
    pub fn well_known(&self) -> Option<WellKnownKey> {
        match self {
            Key::WellKnown(key) => Some(*key),
            Key::Custom(_) => None,
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Key::WellKnown(_) => 0,
            Key::Custom(_) => 1,
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<WellKnownKey> for Key {
    fn from(key: WellKnownKey) -> Self {
        Key::WellKnown(key)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Custom(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Custom(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
