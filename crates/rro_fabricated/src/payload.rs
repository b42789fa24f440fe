//! The structured payload of a fabricated overlay file.
//!
//! The payload is the MessagePack encoding (named maps) of the overlay's
//! identity fields plus its value tree. The tree is keyed with `BTreeMap`s
//! at every level, so identical logical content always encodes to identical
//! bytes — the property the cached-CRC trust rule depends on. Do not swap
//! these maps for hash maps.

use crate::error::Result;
use rro_core::TargetValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// configuration -> value
pub(crate) type ConfigMap = BTreeMap<String, FabricatedValue>;
/// entry -> configurations
pub(crate) type EntryMap = BTreeMap<String, ConfigMap>;
/// type -> entries
pub(crate) type TypeMap = BTreeMap<String, EntryMap>;
/// package -> types
pub(crate) type PackageMap = BTreeMap<String, TypeMap>;

/// One overlaid value as stored in the payload tree.
///
/// For string and binary values, `pool_index` is the index the builder
/// assigned in the overlay string pool — the on-disk `data_value` of
/// string-kind entries. Scalars carry their payload inline and have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricatedValue {
    pub value: TargetValue,
    pub pool_index: Option<u32>,
}

/// The decoded payload: identity fields plus the canonical value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Document {
    pub package_name: String,
    pub name: String,
    pub target_package_name: String,
    pub target_overlayable: Option<String>,
    pub packages: PackageMap,
}

pub(crate) fn encode(document: &Document) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(document)?)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Document> {
    Ok(rmp_serde::from_slice(bytes)?)
}
