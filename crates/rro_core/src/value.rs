use serde::{Deserialize, Serialize};

/// Typed-value kinds of the compiled resource format.
///
/// Only the kinds an overlay can reasonably carry are named here; unknown
/// kinds still round-trip because values store the raw `u8`.
pub mod data_type {
    pub const NULL: u8 = 0x00;
    pub const REFERENCE: u8 = 0x01;
    pub const ATTRIBUTE: u8 = 0x02;
    pub const STRING: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const DIMENSION: u8 = 0x05;
    pub const FRACTION: u8 = 0x06;
    pub const DYNAMIC_REFERENCE: u8 = 0x07;
    pub const DYNAMIC_ATTRIBUTE: u8 = 0x08;
    pub const INT_DEC: u8 = 0x10;
    pub const INT_HEX: u8 = 0x11;
    pub const INT_BOOLEAN: u8 = 0x12;
    pub const INT_COLOR_ARGB8: u8 = 0x1c;
    pub const INT_COLOR_RGB8: u8 = 0x1d;
    pub const INT_COLOR_ARGB4: u8 = 0x1e;
    pub const INT_COLOR_RGB4: u8 = 0x1f;
}

/// A raw typed value as stored in compiled tables and binary XML: a kind
/// byte plus a 32-bit payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    pub data_type: u8,
    pub data: u32,
}

impl TypedValue {
    pub const fn new(data_type: u8, data: u32) -> Self {
        Self { data_type, data }
    }

    /// Whether this value references another resource by id.
    pub const fn is_reference(&self) -> bool {
        matches!(
            self.data_type,
            data_type::REFERENCE | data_type::DYNAMIC_REFERENCE
        )
    }
}

/// A value supplied for a target resource by an overlay.
///
/// Exactly one payload form is meaningful per kind, so the kinds are
/// variants rather than a struct with a mostly-unused field per form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetValue {
    /// A raw typed scalar: integers, booleans, colors, references, or a
    /// string-pool index for string kinds.
    Scalar(TypedValue),
    /// A literal string.
    String(String),
    /// A byte range into the overlay file's binary blob section.
    Binary {
        offset: u64,
        size: u64,
        nine_patch: bool,
    },
}

impl TargetValue {
    /// The typed-value kind this value serializes as.
    pub fn data_type(&self) -> u8 {
        match self {
            TargetValue::Scalar(value) => value.data_type,
            // Strings and binaries resolve through the overlay string pool.
            TargetValue::String(_) | TargetValue::Binary { .. } => data_type::STRING,
        }
    }
}

/// A [`TargetValue`] paired with the configuration it applies to.
///
/// The empty string is the default configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetValueWithConfig {
    pub configuration: String,
    pub value: TargetValue,
}

impl TargetValueWithConfig {
    pub fn new(configuration: impl Into<String>, value: TargetValue) -> Self {
        Self {
            configuration: configuration.into(),
            value,
        }
    }
}
