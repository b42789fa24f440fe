//! Test fakes for the decoder seams, plus APK fixture helpers.
//!
//! The fakes read JSON documents where real decoders would read compiled
//! artifacts: a table fixture describes package id, name tables, and
//! overlayables; an XML fixture describes the element tree. Fixture APKs
//! are real zip archives written with the `zip` crate, so the zip-level
//! code paths (entry lookup, CRCs) are exercised for real.

use crate::decoder::{ApkDecoder, ResourceTable, XmlAttribute, XmlDocument, XmlElement};
use crate::error::{ContainerError, Result};
use camino::Utf8PathBuf;
use rro_core::{data_type, OverlayableInfo, PolicyFlags, ResourceId, TypedValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;

pub(crate) use serde_json::json;

#[derive(Debug, Deserialize)]
struct TableFixture {
    package_id: u8,
    #[serde(default)]
    string_pool_len: u32,
    /// id (hex string) -> resource name
    #[serde(default)]
    resources: BTreeMap<String, String>,
    /// id (hex string) -> string value (file paths etc.)
    #[serde(default)]
    strings: BTreeMap<String, String>,
    /// id (hex string) -> overlayable set
    #[serde(default)]
    overlayables: BTreeMap<String, OverlayableFixture>,
}

#[derive(Debug, Deserialize)]
struct OverlayableFixture {
    name: String,
    actor: String,
    policies: u32,
}

#[derive(Debug, Deserialize)]
struct XmlFixture {
    root: ElementFixture,
}

#[derive(Debug, Deserialize)]
struct ElementFixture {
    name: String,
    #[serde(default)]
    attributes: Vec<AttributeFixture>,
    #[serde(default)]
    children: Vec<ElementFixture>,
    #[serde(default)]
    string_pool: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct AttributeFixture {
    name: String,
    #[serde(default)]
    data_type: Option<u8>,
    #[serde(default)]
    data: Option<u32>,
    #[serde(default)]
    string: Option<String>,
}

fn parse_id(raw: &str) -> ResourceId {
    let digits = raw.trim_start_matches("0x");
    ResourceId(u32::from_str_radix(digits, 16).expect("fixture resource id"))
}

struct FakeTable {
    package_id: u8,
    string_pool_len: u32,
    resources: BTreeMap<ResourceId, String>,
    strings: BTreeMap<ResourceId, String>,
    overlayables: BTreeMap<ResourceId, OverlayableInfo>,
}

impl ResourceTable for FakeTable {
    fn package_id(&self) -> u8 {
        self.package_id
    }

    fn resource_id(&self, name: &str) -> Result<ResourceId> {
        self.resources
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| ContainerError::ResourceNotFound(name.to_string()))
    }

    fn resource_name(&self, id: ResourceId) -> Result<String> {
        self.resources
            .get(&id)
            .cloned()
            .ok_or(ContainerError::ResourceIdNotFound(id))
    }

    fn resource_ids(&self) -> Vec<ResourceId> {
        self.resources.keys().copied().collect()
    }

    fn string_pool_len(&self) -> u32 {
        self.string_pool_len
    }

    fn defines_overlayable(&self) -> bool {
        !self.overlayables.is_empty()
    }

    fn overlayable_info(&self, id: ResourceId) -> Result<Option<OverlayableInfo>> {
        Ok(self.overlayables.get(&id).cloned())
    }

    fn resolve_string(&self, id: ResourceId) -> Result<String> {
        self.strings
            .get(&id)
            .cloned()
            .ok_or(ContainerError::ResourceIdNotFound(id))
    }
}

/// Decoder that understands the JSON fixtures above.
pub(crate) struct FakeDecoder;

impl ApkDecoder for FakeDecoder {
    fn decode_table(&self, data: &[u8]) -> Result<Box<dyn ResourceTable>> {
        let fixture: TableFixture = serde_json::from_slice(data)
            .map_err(|e| ContainerError::Decoder(format!("table fixture: {e}")))?;
        Ok(Box::new(FakeTable {
            package_id: fixture.package_id,
            string_pool_len: fixture.string_pool_len,
            resources: fixture
                .resources
                .iter()
                .map(|(id, name)| (parse_id(id), name.clone()))
                .collect(),
            strings: fixture
                .strings
                .iter()
                .map(|(id, value)| (parse_id(id), value.clone()))
                .collect(),
            overlayables: fixture
                .overlayables
                .iter()
                .map(|(id, o)| {
                    (
                        parse_id(id),
                        OverlayableInfo {
                            name: o.name.clone(),
                            actor: o.actor.clone(),
                            policies: PolicyFlags::from_bits_truncate(o.policies),
                        },
                    )
                })
                .collect(),
        }))
    }

    fn decode_xml(&self, data: &[u8]) -> Result<XmlDocument> {
        let fixture: XmlFixture = serde_json::from_slice(data)
            .map_err(|e| ContainerError::Decoder(format!("xml fixture: {e}")))?;
        let string_pool = fixture.root.string_pool.clone();
        Ok(XmlDocument {
            root: convert_element(fixture.root),
            string_pool,
        })
    }
}

fn convert_element(fixture: ElementFixture) -> XmlElement {
    XmlElement {
        name: fixture.name,
        attributes: fixture
            .attributes
            .into_iter()
            .map(|a| XmlAttribute {
                name: a.name,
                typed: TypedValue::new(
                    a.data_type.unwrap_or(data_type::STRING),
                    a.data.unwrap_or(0),
                ),
                string: a.string,
            })
            .collect(),
        children: fixture.children.into_iter().map(convert_element).collect(),
    }
}

/// Write a fixture APK: a real zip with the manifest and table fixtures at
/// their well-known entry names, plus any extra entries.
pub(crate) fn write_apk(
    dir: &std::path::Path,
    file_name: &str,
    manifest: &serde_json::Value,
    table: &serde_json::Value,
    extra: &[(&str, &[u8])],
) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.join(file_name)).unwrap();
    let file = std::fs::File::create(path.as_std_path()).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("AndroidManifest.xml", options).unwrap();
    zip.write_all(&serde_json::to_vec(manifest).unwrap()).unwrap();

    zip.start_file("resources.arsc", options).unwrap();
    zip.write_all(&serde_json::to_vec(table).unwrap()).unwrap();

    for (name, bytes) in extra {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }

    zip.finish().unwrap();
    path
}
