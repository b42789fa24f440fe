//! Decoder seams for compiled Android artifacts.
//!
//! This module defines the traits that decouple
//! [`ApkResourceContainer`](crate::ApkResourceContainer) from any
//! particular decoder for compiled resource tables (`resources.arsc`) and
//! binary XML documents. The containers only need the narrow views below;
//! the heavy decoding lives behind [`ApkDecoder`], supplied by the caller.
//! Tests supply fakes.

use crate::error::Result;
use rro_core::{OverlayableInfo, ResourceId, TypedValue};

/// Decoded view of a compiled resource table.
///
/// Implementations are expected to expose the table's *first* package —
/// the one the APK defines — through [`package_id`](Self::package_id) and
/// [`resource_ids`](Self::resource_ids).
pub trait ResourceTable {
    /// Package id byte of the table's own package (e.g. `0x7f`).
    fn package_id(&self) -> u8;

    /// Look a resource id up by `[package:]type/entry` name.
    fn resource_id(&self, name: &str) -> Result<ResourceId>;

    /// Look a resource name up by id.
    fn resource_name(&self, id: ResourceId) -> Result<String>;

    /// Every resource id defined directly by the table's own package, in a
    /// stable order.
    fn resource_ids(&self) -> Vec<ResourceId>;

    /// Number of entries in the table's global string pool. Used to offset
    /// the indices of a separately-carried pool consulted together with it.
    fn string_pool_len(&self) -> u32;

    /// Whether the table declares any overlayable set.
    fn defines_overlayable(&self) -> bool;

    /// The overlayable set a resource belongs to, if any.
    fn overlayable_info(&self, id: ResourceId) -> Result<Option<OverlayableInfo>>;

    /// Resolve a string-typed resource (e.g. a file-path entry) to its
    /// string value.
    fn resolve_string(&self, id: ResourceId) -> Result<String>;
}

/// A decoded binary XML document.
///
/// The raw string pool travels with the tree so overlay-mapping documents
/// can hand their pool bytes to the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
    pub string_pool: Vec<u8>,
}

/// One element of a decoded binary XML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Find an attribute by local name. Namespacing is resolved by the
    /// decoder; overlay manifests only use the framework namespace.
    pub fn attribute(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// One attribute: its typed value, plus the resolved string for
/// string-typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub typed: TypedValue,
    pub string: Option<String>,
}

impl XmlAttribute {
    pub fn as_str(&self) -> Option<&str> {
        self.string.as_deref()
    }
}

/// External collaborator that decodes compiled artifacts into the views
/// above.
pub trait ApkDecoder {
    /// Decode a compiled resource table.
    fn decode_table(&self, data: &[u8]) -> Result<Box<dyn ResourceTable>>;

    /// Decode a compiled binary XML document.
    fn decode_xml(&self, data: &[u8]) -> Result<XmlDocument>;
}
