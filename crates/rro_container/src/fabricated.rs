//! Fabricated-overlay-backed resource container.
//!
//! Trivial next to the APK container: a decoded [`FabricatedOverlay`]
//! already holds everything in memory, so extraction is a flatten of its
//! canonical value tree.

use crate::container::{OverlayResourceContainer, ResourceContainer};
use crate::data::{
    InlineStringPoolData, OverlayData, OverlayManifestInfo, OverlayValue, OverlayValuePayload,
};
use crate::error::{ContainerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use rro_core::{ResourceId, TargetValueWithConfig};
use rro_fabricated::FabricatedOverlay;
use std::fs::File;
use std::io::BufReader;

/// A resource container backed by a fabricated overlay file.
pub struct FabricatedOverlayContainer {
    path: Utf8PathBuf,
    overlay: FabricatedOverlay,
}

impl FabricatedOverlayContainer {
    /// Decode the fabricated overlay at `path`.
    pub fn from_path(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(path.as_std_path())?;
        let overlay = FabricatedOverlay::from_reader(BufReader::new(file))?;
        Ok(Self { path, overlay })
    }

    /// Wrap an overlay record that is already in memory, recording the
    /// path it lives at (or will be written to).
    pub fn from_overlay(path: impl Into<Utf8PathBuf>, overlay: FabricatedOverlay) -> Self {
        Self {
            path: path.into(),
            overlay,
        }
    }

    /// The decoded overlay record.
    pub fn overlay(&self) -> &FabricatedOverlay {
        &self.overlay
    }
}

impl ResourceContainer for FabricatedOverlayContainer {
    fn crc(&mut self) -> Result<u32> {
        Ok(self.overlay.crc()?)
    }

    fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Fabricated overlays carry no compiled table; nothing is addressable
    /// by id.
    fn resource_name(&mut self, id: ResourceId) -> Result<String> {
        Err(ContainerError::NoIdResources(id))
    }
}

impl OverlayResourceContainer for FabricatedOverlayContainer {
    fn find_overlay_info(&mut self, name: &str) -> Result<OverlayManifestInfo> {
        if name != self.overlay.name() {
            return Err(ContainerError::OverlayNotFound {
                name: name.to_string(),
                path: self.path.clone(),
            });
        }
        Ok(OverlayManifestInfo {
            package_name: self.overlay.package_name().to_string(),
            name: self.overlay.name().to_string(),
            target_package: self.overlay.target_package_name().to_string(),
            target_name: self.overlay.target_overlayable().map(str::to_string),
            resource_mapping: None,
        })
    }

    fn overlay_data(&mut self, _info: &OverlayManifestInfo) -> Result<OverlayData> {
        let values = self
            .overlay
            .entries()
            .map(|entry| OverlayValue {
                resource_name: format!("{}:{}/{}", entry.package, entry.type_name, entry.entry),
                payload: OverlayValuePayload::Inline(TargetValueWithConfig::new(
                    entry.configuration,
                    entry.value.clone(),
                )),
            })
            .collect();

        // No compiled pool to collide with, so the offset is zero.
        Ok(OverlayData {
            values,
            string_pool: Some(InlineStringPoolData {
                data: self.overlay.string_pool().to_vec(),
                offset: 0,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rro_core::{data_type, TargetValue};
    use rro_fabricated::{FabricatedOverlayBuilder, StringPool};

    fn write_overlay(dir: &std::path::Path, overlay: &FabricatedOverlay) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.join("overlay.frro")).unwrap();
        let mut file = File::create(path.as_std_path()).unwrap();
        overlay.to_writer(&mut file).unwrap();
        path
    }

    #[test]
    fn test_find_overlay_info_matches_own_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "Theme", "com.example")
            .with_overlayable("ThemeResources")
            .build()
            .unwrap();
        let path = write_overlay(dir.path(), &overlay);

        let mut container = FabricatedOverlayContainer::from_path(path).unwrap();
        let info = container.find_overlay_info("Theme").unwrap();
        assert_eq!(info.package_name, "com.overlay");
        assert_eq!(info.target_package, "com.example");
        assert_eq!(info.target_name.as_deref(), Some("ThemeResources"));
        assert_eq!(info.resource_mapping, None);

        assert!(matches!(
            container.find_overlay_info("Other"),
            Err(ContainerError::OverlayNotFound { .. })
        ));
        assert!(matches!(
            container.find_overlay_info(""),
            Err(ContainerError::OverlayNotFound { .. })
        ));
    }

    #[test]
    fn test_overlay_data_flattens_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "Theme", "com.example")
            .with_string_value("string/app_name", "Hello", "")
            .with_string_value("string/app_name", "Hallo", "de")
            .with_resource_value("integer/answer", data_type::INT_DEC, 42, "")
            .build()
            .unwrap();
        let path = write_overlay(dir.path(), &overlay);

        let mut container = FabricatedOverlayContainer::from_path(path).unwrap();
        let info = container.find_overlay_info("Theme").unwrap();
        let data = container.overlay_data(&info).unwrap();

        assert_eq!(data.values.len(), 3);
        assert_eq!(data.values[0].resource_name, "com.example:integer/answer");
        assert_eq!(data.values[1].resource_name, "com.example:string/app_name");
        assert_eq!(
            data.values[1].payload,
            OverlayValuePayload::Inline(TargetValueWithConfig::new(
                "",
                TargetValue::String("Hello".to_string()),
            ))
        );
        assert_eq!(
            data.values[2].payload,
            OverlayValuePayload::Inline(TargetValueWithConfig::new(
                "de",
                TargetValue::String("Hallo".to_string()),
            ))
        );

        let pool_data = data.string_pool.unwrap();
        assert_eq!(pool_data.offset, 0);
        let pool = StringPool::parse(&pool_data.data).unwrap();
        assert_eq!(pool.get(0), Some("Hello"));
        assert_eq!(pool.get(1), Some("Hallo"));
    }

    #[test]
    fn test_crc_delegates_to_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_string_value("string/app_name", "Hello", "")
            .build()
            .unwrap();
        let expected = overlay.crc().unwrap();
        let path = write_overlay(dir.path(), &overlay);

        let mut container = FabricatedOverlayContainer::from_path(path).unwrap();
        assert_eq!(container.crc().unwrap(), expected);
    }

    #[test]
    fn test_resource_name_always_fails() {
        let dir = tempfile::tempdir().unwrap();
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .build()
            .unwrap();
        let path = write_overlay(dir.path(), &overlay);

        let mut container = FabricatedOverlayContainer::from_path(path).unwrap();
        assert!(matches!(
            container.resource_name(ResourceId(0x7f010000)),
            Err(ContainerError::NoIdResources(_))
        ));
    }
}
