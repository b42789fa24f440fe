//! Builder for fabricated overlays.
//!
//! The builder collects flat `(resource name, value)` assignments and
//! normalizes them at [`build`](FabricatedOverlayBuilder::build) time:
//! names are parsed and package-defaulted, duplicate keys collapse
//! last-write-wins, and string/binary values are interned into the
//! overlay's string pool.

use crate::error::{FabricatedOverlayError, Result};
use crate::payload::{Document, FabricatedValue, PackageMap};
use crate::string_pool::StringPoolBuilder;
use crate::{BinaryData, BinarySource, FabricatedOverlay, FILE_HEADER_SIZE};
use camino::Utf8PathBuf;
use rro_core::{ResourceName, TargetValue, TypedValue};
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// Builds an immutable [`FabricatedOverlay`] from per-resource assignments.
///
/// Resource names use the `[package:]type/entry` syntax; an omitted package
/// defaults to the target package. The configuration qualifier selects a
/// device configuration (locale, density, ...); pass `""` for the default
/// configuration.
///
/// Name parsing and binary-source validation are deferred to
/// [`build`](Self::build) — the `with_*` methods never fail.
#[derive(Debug, Clone)]
pub struct FabricatedOverlayBuilder {
    package_name: String,
    name: String,
    target_package_name: String,
    target_overlayable: Option<String>,
    frro_path: Option<Utf8PathBuf>,
    entries: Vec<PendingEntry>,
}

#[derive(Debug, Clone)]
struct PendingEntry {
    resource_name: String,
    configuration: String,
    value: PendingValue,
}

#[derive(Debug, Clone)]
enum PendingValue {
    Scalar(TypedValue),
    String(String),
    Binary {
        source: Utf8PathBuf,
        nine_patch: bool,
    },
}

impl FabricatedOverlayBuilder {
    /// Seed the overlay's identity: its own package name, its overlay name
    /// (empty for the unnamed overlay), and the package it targets.
    pub fn new(
        package_name: impl Into<String>,
        name: impl Into<String>,
        target_package_name: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            name: name.into(),
            target_package_name: target_package_name.into(),
            target_overlayable: None,
            frro_path: None,
            entries: Vec::new(),
        }
    }

    /// Constrain the overlay to a named overlayable set of the target.
    pub fn with_overlayable(mut self, name: impl Into<String>) -> Self {
        self.target_overlayable = Some(name.into());
        self
    }

    /// Set the path the overlay will be written to.
    ///
    /// Required when binary values are supplied: the `frro:/` URIs interned
    /// for them embed this path.
    pub fn with_frro_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.frro_path = Some(path.into());
        self
    }

    /// Assign a typed scalar value (integer, boolean, color, reference, ...)
    /// to a resource.
    pub fn with_resource_value(
        mut self,
        resource_name: impl Into<String>,
        data_type: u8,
        data_value: u32,
        configuration: impl Into<String>,
    ) -> Self {
        self.entries.push(PendingEntry {
            resource_name: resource_name.into(),
            configuration: configuration.into(),
            value: PendingValue::Scalar(TypedValue::new(data_type, data_value)),
        });
        self
    }

    /// Assign a string literal to a resource.
    pub fn with_string_value(
        mut self,
        resource_name: impl Into<String>,
        value: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        self.entries.push(PendingEntry {
            resource_name: resource_name.into(),
            configuration: configuration.into(),
            value: PendingValue::String(value.into()),
        });
        self
    }

    /// Assign externally-supplied binary data (an image file, say) to a
    /// resource. The file is stat'd at build time and its bytes are
    /// appended to the overlay file's blob section on write.
    pub fn with_binary_value(
        mut self,
        resource_name: impl Into<String>,
        source: impl Into<Utf8PathBuf>,
        nine_patch: bool,
        configuration: impl Into<String>,
    ) -> Self {
        self.entries.push(PendingEntry {
            resource_name: resource_name.into(),
            configuration: configuration.into(),
            value: PendingValue::Binary {
                source: source.into(),
                nine_patch,
            },
        });
        self
    }

    /// Normalize the recorded assignments into an immutable overlay record.
    ///
    /// Fails on the first malformed resource name, on a binary source that
    /// cannot be stat'd, or on binary values without a prior
    /// [`with_frro_path`](Self::with_frro_path). Nothing is partially
    /// constructed on failure.
    pub fn build(self) -> Result<FabricatedOverlay> {
        tracing::debug!(
            "building fabricated overlay '{}' for target '{}' ({} assignments)",
            self.name,
            self.target_package_name,
            self.entries.len()
        );

        // Group last-write-wins into the canonical tree; a later assignment
        // to the same (package, type, entry, configuration) replaces the
        // earlier one.
        let mut staged: BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, PendingValue>>>> =
            BTreeMap::new();
        for entry in self.entries {
            let name = ResourceName::parse(&entry.resource_name)?;
            let package = name.package_or(&self.target_package_name).to_string();
            staged
                .entry(package)
                .or_default()
                .entry(name.type_name)
                .or_default()
                .entry(name.entry)
                .or_default()
                .insert(entry.configuration, entry.value);
        }

        // Walk the tree in canonical order, interning pool strings and
        // assigning blob offsets. Encounter order here is the order the
        // blob section is written in.
        let mut pool = StringPoolBuilder::new();
        let mut sources = Vec::new();
        let mut next_offset = FILE_HEADER_SIZE;
        let mut packages = PackageMap::new();

        for (package, types) in staged {
            for (type_name, entries) in types {
                for (entry, configs) in entries {
                    for (configuration, pending) in configs {
                        let value = match pending {
                            PendingValue::Scalar(typed) => FabricatedValue {
                                value: TargetValue::Scalar(typed),
                                pool_index: None,
                            },
                            PendingValue::String(literal) => {
                                let pool_index = pool.intern(&literal);
                                FabricatedValue {
                                    value: TargetValue::String(literal),
                                    pool_index: Some(pool_index),
                                }
                            }
                            PendingValue::Binary { source, nine_patch } => {
                                let frro_path = self
                                    .frro_path
                                    .as_ref()
                                    .ok_or(FabricatedOverlayError::MissingFrroPath)?;
                                let size = std::fs::metadata(source.as_std_path())
                                    .map_err(|e| FabricatedOverlayError::BinarySource {
                                        path: source.clone(),
                                        source: e,
                                    })?
                                    .len();
                                let offset = next_offset;
                                next_offset += size;
                                let uri =
                                    format!("frro:/{frro_path}?offset={offset}&size={size}");
                                let pool_index = pool.intern(&uri);
                                sources.push(BinarySource {
                                    path: source,
                                    size,
                                });
                                FabricatedValue {
                                    value: TargetValue::Binary {
                                        offset,
                                        size,
                                        nine_patch,
                                    },
                                    pool_index: Some(pool_index),
                                }
                            }
                        };
                        packages
                            .entry(package.clone())
                            .or_default()
                            .entry(type_name.clone())
                            .or_default()
                            .entry(entry.clone())
                            .or_default()
                            .insert(configuration, value);
                    }
                }
            }
        }

        Ok(FabricatedOverlay {
            document: Document {
                package_name: self.package_name,
                name: self.name,
                target_package_name: self.target_package_name,
                target_overlayable: self.target_overlayable,
                packages,
            },
            string_pool: pool.build(),
            binaries: BinaryData::Sources(sources),
            payload_cache: OnceCell::new(),
            crc_cache: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_pool::StringPool;
    use rro_core::data_type;
    use std::io::Write;

    #[test]
    fn test_name_defaulting() {
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "Theme", "com.example")
            .with_string_value("string/app_name", "Hello", "")
            .build()
            .unwrap();

        let entries: Vec<_> = overlay.entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].package, "com.example");
        assert_eq!(entries[0].type_name, "string");
        assert_eq!(entries[0].entry, "app_name");
    }

    #[test]
    fn test_explicit_package_is_kept() {
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "Theme", "com.example")
            .with_string_value("com.other:string/app_name", "Hello", "")
            .build()
            .unwrap();

        let entries: Vec<_> = overlay.entries().collect();
        assert_eq!(entries[0].package, "com.other");
    }

    #[test]
    fn test_last_write_wins() {
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_resource_value("integer/answer", data_type::INT_DEC, 41, "")
            .with_resource_value("integer/answer", data_type::INT_DEC, 42, "")
            .build()
            .unwrap();

        let entries: Vec<_> = overlay.entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].value,
            &TargetValue::Scalar(TypedValue::new(data_type::INT_DEC, 42))
        );
    }

    #[test]
    fn test_distinct_configurations_coexist() {
        let overlay = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_string_value("string/app_name", "Hello", "")
            .with_string_value("string/app_name", "Hallo", "de")
            .build()
            .unwrap();

        let configurations: Vec<_> = overlay.entries().map(|e| e.configuration.to_string()).collect();
        assert_eq!(configurations, ["", "de"]);
    }

    #[test]
    fn test_malformed_name_fails_build() {
        let result = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_string_value("app_name", "Hello", "")
            .build();
        assert!(matches!(
            result,
            Err(FabricatedOverlayError::Name(_))
        ));
    }

    #[test]
    fn test_binary_value_requires_frro_path() {
        let result = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_binary_value("drawable/logo", "/nonexistent/logo.png", false, "")
            .build();
        assert!(matches!(
            result,
            Err(FabricatedOverlayError::MissingFrroPath)
        ));
    }

    #[test]
    fn test_missing_binary_source_fails_build() {
        let result = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_frro_path("/tmp/overlay.frro")
            .with_binary_value("drawable/logo", "/nonexistent/logo.png", false, "")
            .build();
        assert!(matches!(
            result,
            Err(FabricatedOverlayError::BinarySource { .. })
        ));
    }

    #[test]
    fn test_binary_values_get_frro_uris() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        let banner = dir.path().join("banner.png");
        std::fs::File::create(&logo)
            .unwrap()
            .write_all(&[0xAA; 100])
            .unwrap();
        std::fs::File::create(&banner)
            .unwrap()
            .write_all(&[0xBB; 8])
            .unwrap();

        let overlay = FabricatedOverlayBuilder::new("com.overlay", "", "com.example")
            .with_frro_path("/data/overlays/test.frro")
            .with_binary_value("drawable/banner", banner.to_str().unwrap(), false, "")
            .with_binary_value("drawable/logo", logo.to_str().unwrap(), true, "")
            .build()
            .unwrap();

        // Canonical order is alphabetical: banner before logo, blob offsets
        // starting right after the 16-byte fixed header.
        let entries: Vec<_> = overlay.entries().collect();
        assert_eq!(
            entries[0].value,
            &TargetValue::Binary {
                offset: 16,
                size: 8,
                nine_patch: false
            }
        );
        assert_eq!(
            entries[1].value,
            &TargetValue::Binary {
                offset: 24,
                size: 100,
                nine_patch: true
            }
        );
        assert_eq!(overlay.total_binary_bytes(), 108);

        let pool = StringPool::parse(overlay.string_pool()).unwrap();
        assert_eq!(
            pool.get(entries[0].pool_index.unwrap()),
            Some("frro://data/overlays/test.frro?offset=16&size=8")
        );
        assert_eq!(
            pool.get(entries[1].pool_index.unwrap()),
            Some("frro://data/overlays/test.frro?offset=24&size=100")
        );
    }
}
