use serde::{Deserialize, Serialize};
use std::fmt;

/// A packed resource identifier: `0xPPTTEEEE` (package, type, entry).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Pack a resource id from its package, type, and entry components.
    pub const fn from_parts(package_id: u8, type_id: u8, entry_id: u16) -> Self {
        Self(((package_id as u32) << 24) | ((type_id as u32) << 16) | entry_id as u32)
    }

    /// The package component (`0xPP......`).
    pub const fn package_id(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The type component (`0x..TT....`).
    pub const fn type_id(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// The entry component (`0x....EEEE`).
    pub const fn entry_id(self) -> u16 {
        self.0 as u16
    }
}

impl From<u32> for ResourceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ResourceId> for u32 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
