//! APK-backed resource container.
//!
//! An APK is a zip archive carrying a compiled resource table
//! (`resources.arsc`) and a compiled manifest (`AndroidManifest.xml`).
//! [`ApkResourceContainer`] implements both container roles over one
//! lazily-materialized internal state: the archive is opened on first
//! access, the resource table decoded on first lookup, and both are cached
//! for the container's lifetime. A failure at any stage surfaces to the
//! caller; nothing is retried.

use crate::container::{OverlayResourceContainer, ResourceContainer, TargetResourceContainer};
use crate::data::{
    InlineStringPoolData, OverlayData, OverlayManifestInfo, OverlayValue, OverlayValuePayload,
};
use crate::decoder::{ApkDecoder, ResourceTable, XmlAttribute};
use crate::error::{ContainerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use rro_core::{data_type, OverlayableInfo, ResourceId, TargetValue, TargetValueWithConfig, TypedValue};
use std::fs::File;
use std::io::Read;
use zip::ZipArchive;

/// Zip entry name of the compiled resource table.
const RESOURCES_ENTRY: &str = "resources.arsc";

/// Zip entry name of the compiled manifest.
const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// A resource container backed by a compiled APK.
pub struct ApkResourceContainer {
    path: Utf8PathBuf,
    decoder: Box<dyn ApkDecoder>,
    zip: Option<ZipArchive<File>>,
    table: Option<Box<dyn ResourceTable>>,
}

impl ApkResourceContainer {
    /// Wrap an APK path. The archive is not touched until first use.
    pub fn from_path(path: impl Into<Utf8PathBuf>, decoder: Box<dyn ApkDecoder>) -> Self {
        Self {
            path: path.into(),
            decoder,
            zip: None,
            table: None,
        }
    }

    fn zip(&mut self) -> Result<&mut ZipArchive<File>> {
        if self.zip.is_none() {
            let file = File::open(self.path.as_std_path())?;
            self.zip = Some(ZipArchive::new(file)?);
        }
        Ok(self.zip.as_mut().expect("archive just initialized"))
    }

    fn table(&mut self) -> Result<&dyn ResourceTable> {
        if self.table.is_none() {
            tracing::debug!("loading resource table from {}", self.path);
            let bytes = self.read_entry(RESOURCES_ENTRY)?;
            self.table = Some(self.decoder.decode_table(&bytes)?);
        }
        Ok(self.table.as_deref().expect("table just initialized"))
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self.zip()?.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn entry_crc(&mut self, name: &str) -> Result<u32> {
        Ok(self.zip()?.by_name(name)?.crc32())
    }

    /// Modern path: walk the overlay-mapping document the manifest points
    /// at and emit one value per `<item>`.
    fn overlay_data_from_mapping(&mut self, mapping_id: ResourceId) -> Result<OverlayData> {
        let mapping_path = self.table()?.resolve_string(mapping_id)?;
        let (package_id, pool_offset) = {
            let table = self.table()?;
            (table.package_id(), table.string_pool_len())
        };

        let bytes = self.read_entry(&mapping_path)?;
        let document = self.decoder.decode_xml(&bytes)?;
        if document.root.name != "overlay" {
            return Err(ContainerError::MalformedResourceMapping(
                "root element is not <overlay>".to_string(),
            ));
        }

        let mut values = Vec::new();
        for item in document.root.children.iter().filter(|c| c.name == "item") {
            let target = item
                .attribute("target")
                .and_then(XmlAttribute::as_str)
                .ok_or_else(|| {
                    ContainerError::MalformedResourceMapping(
                        "<item> element is missing the target attribute".to_string(),
                    )
                })?;
            let typed = item.attribute("value").map(|a| a.typed).ok_or_else(|| {
                ContainerError::MalformedResourceMapping(
                    "<item> element is missing the value attribute".to_string(),
                )
            })?;

            let payload = if typed.data_type == data_type::STRING {
                // Shift the pool index past the compiled table's own pool
                // so the two can be consulted together without collisions.
                OverlayValuePayload::Inline(TargetValueWithConfig::new(
                    "",
                    TargetValue::Scalar(TypedValue::new(
                        data_type::STRING,
                        typed.data + pool_offset,
                    )),
                ))
            } else if typed.is_reference() {
                let overlay_id = ResourceId(typed.data);
                OverlayValuePayload::Reference {
                    overlay_id,
                    rewrite_id: overlay_id.package_id() == package_id,
                }
            } else {
                OverlayValuePayload::Inline(TargetValueWithConfig::new(
                    "",
                    TargetValue::Scalar(typed),
                ))
            };

            values.push(OverlayValue {
                resource_name: target.to_string(),
                payload,
            });
        }

        Ok(OverlayData {
            values,
            string_pool: Some(InlineStringPoolData {
                data: document.string_pool,
                offset: pool_offset,
            }),
        })
    }

    /// Legacy path: the whole overlay package is the mapping. Every
    /// resource the overlay defines overrides the target resource of the
    /// same name. Legacy overlays never supported internal
    /// self-references, so `rewrite_id` stays false here no matter what
    /// the resource actually references.
    fn overlay_data_legacy(&mut self) -> Result<OverlayData> {
        let ids = self.table()?.resource_ids();
        let mut values = Vec::with_capacity(ids.len());
        for id in ids {
            let resource_name = self.table()?.resource_name(id)?;
            values.push(OverlayValue {
                resource_name,
                payload: OverlayValuePayload::Reference {
                    overlay_id: id,
                    rewrite_id: false,
                },
            });
        }
        Ok(OverlayData {
            values,
            string_pool: None,
        })
    }
}

impl ResourceContainer for ApkResourceContainer {
    /// XOR of the zip-level CRCs of the resource table and the manifest,
    /// so that either file changing invalidates the overlay's identity.
    fn crc(&mut self) -> Result<u32> {
        Ok(self.entry_crc(RESOURCES_ENTRY)? ^ self.entry_crc(MANIFEST_ENTRY)?)
    }

    fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn resource_name(&mut self, id: ResourceId) -> Result<String> {
        self.table()?.resource_name(id)
    }
}

impl TargetResourceContainer for ApkResourceContainer {
    fn defines_overlayable(&mut self) -> Result<bool> {
        Ok(self.table()?.defines_overlayable())
    }

    fn overlayable_info(&mut self, id: ResourceId) -> Result<Option<OverlayableInfo>> {
        self.table()?.overlayable_info(id)
    }

    fn resource_id(&mut self, name: &str) -> Result<ResourceId> {
        self.table()?.resource_id(name)
    }
}

impl OverlayResourceContainer for ApkResourceContainer {
    fn find_overlay_info(&mut self, name: &str) -> Result<OverlayManifestInfo> {
        let manifest_bytes = self.read_entry(MANIFEST_ENTRY)?;
        let document = self.decoder.decode_xml(&manifest_bytes)?;

        let root = &document.root;
        if root.name != "manifest" {
            return Err(ContainerError::MalformedManifest(
                "root element is not <manifest>".to_string(),
            ));
        }
        let package_name = root
            .attribute("package")
            .and_then(XmlAttribute::as_str)
            .ok_or_else(|| {
                ContainerError::MalformedManifest(
                    "<manifest> is missing the package attribute".to_string(),
                )
            })?
            .to_string();

        for overlay in root.children.iter().filter(|c| c.name == "overlay") {
            // The empty requested name matches only an <overlay> without a
            // name attribute.
            let overlay_name = overlay
                .attribute("name")
                .and_then(XmlAttribute::as_str)
                .unwrap_or("");
            if overlay_name != name {
                continue;
            }

            let target_package = overlay
                .attribute("targetPackage")
                .and_then(XmlAttribute::as_str)
                .ok_or_else(|| {
                    ContainerError::MalformedManifest(
                        "<overlay> is missing the targetPackage attribute".to_string(),
                    )
                })?
                .to_string();
            let target_name = overlay
                .attribute("targetName")
                .and_then(XmlAttribute::as_str)
                .map(str::to_string);
            let resource_mapping = match overlay.attribute("resourcesMap") {
                Some(attr) if attr.typed.is_reference() => Some(ResourceId(attr.typed.data)),
                Some(_) => {
                    return Err(ContainerError::MalformedManifest(
                        "resourcesMap attribute must be a resource reference".to_string(),
                    ))
                }
                None => None,
            };

            return Ok(OverlayManifestInfo {
                package_name,
                name: name.to_string(),
                target_package,
                target_name,
                resource_mapping,
            });
        }

        Err(ContainerError::OverlayNotFound {
            name: name.to_string(),
            path: self.path.clone(),
        })
    }

    fn overlay_data(&mut self, info: &OverlayManifestInfo) -> Result<OverlayData> {
        match info.resource_mapping {
            Some(mapping_id) => self.overlay_data_from_mapping(mapping_id),
            None => self.overlay_data_legacy(),
        }
    }
}
