//! Fabricated resource overlay (`.frro`) reader, writer and builder.
//!
//! A fabricated overlay overrides a target package's resources with values
//! authored directly as data — no resource compiler, no APK. This crate
//! owns the container format:
//!
//! - [`FabricatedOverlayBuilder`] turns flat `(resource name, value)`
//!   assignments into a normalized, immutable [`FabricatedOverlay`]
//! - the versioned binary codec ([`FabricatedOverlay::from_reader`] /
//!   [`FabricatedOverlay::to_writer`]) with CRC-32 integrity
//! - the auxiliary [`StringPool`] carrying string literals and the
//!   `frro:/` URIs of external binary values
//!
//! File layout (all integers little-endian):
//!
//! ```text
//! magic               u32  b"FRRO"
//! version             u32  1, 2, or 3 (writers emit 3)
//! crc                 u32  CRC-32 of (version || payload)
//! total_binary_bytes  u32  [v3] length of the blob section
//! binary_blob_bytes   ...  [v3] concatenated external binaries
//! string_pool_length  u32  [v2]
//! string_pool_bytes   ...  [v2]
//! payload_bytes       ...  structured record (identity + value tree)
//! ```

use camino::Utf8PathBuf;
use rro_core::TargetValue;
use std::cell::OnceCell;

pub mod builder;
mod error;
mod payload;
mod read;
mod string_pool;
mod write;

pub use builder::FabricatedOverlayBuilder;
pub use error::{FabricatedOverlayError, Result};
pub use payload::FabricatedValue;
pub use string_pool::{StringPool, StringPoolBuilder};

/// Leading magic of a fabricated overlay file.
pub const MAGIC: [u8; 4] = *b"FRRO";

/// The version written by this crate.
pub const CURRENT_VERSION: u32 = 3;

/// The oldest version this crate still reads.
pub const OLDEST_SUPPORTED_VERSION: u32 = 1;

/// Byte size of the fixed header (magic, version, crc, blob length) that
/// precedes the blob section. Blob offsets embedded in `frro:/` URIs are
/// relative to the start of the file and therefore start here.
pub const FILE_HEADER_SIZE: u64 = 16;

/// An immutable fabricated overlay record.
///
/// Created by [`FabricatedOverlayBuilder::build`] or decoded from a stream
/// with [`FabricatedOverlay::from_reader`]. The serialized payload and its
/// CRC are materialized at most once, on first need.
#[derive(Debug)]
pub struct FabricatedOverlay {
    pub(crate) document: payload::Document,
    pub(crate) string_pool: Vec<u8>,
    pub(crate) binaries: BinaryData,
    pub(crate) payload_cache: OnceCell<Vec<u8>>,
    pub(crate) crc_cache: OnceCell<u32>,
}

/// Where the blob section's bytes come from when serializing.
#[derive(Debug)]
pub(crate) enum BinaryData {
    /// Byte ranges recorded at build time, streamed from their source
    /// files on write.
    Sources(Vec<BinarySource>),
    /// The blob section captured from a decoded stream.
    Captured(Vec<u8>),
}

/// One externally-supplied binary payload recorded by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySource {
    pub(crate) path: Utf8PathBuf,
    pub(crate) size: u64,
}

/// A borrowed view of one `(package, type, entry, configuration)` value,
/// yielded in canonical order by [`FabricatedOverlay::entries`].
#[derive(Debug, Clone, Copy)]
pub struct FabricatedEntry<'a> {
    pub package: &'a str,
    pub type_name: &'a str,
    pub entry: &'a str,
    pub configuration: &'a str,
    pub value: &'a TargetValue,
    /// String-pool index of string and binary values.
    pub pool_index: Option<u32>,
}

impl FabricatedOverlay {
    /// Package name of the overlay itself.
    pub fn package_name(&self) -> &str {
        &self.document.package_name
    }

    /// Overlay identifier; empty for the unnamed overlay.
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Package whose resources this overlay overrides.
    pub fn target_package_name(&self) -> &str {
        &self.document.target_package_name
    }

    /// Optional target overlayable-set constraint.
    pub fn target_overlayable(&self) -> Option<&str> {
        self.document.target_overlayable.as_deref()
    }

    /// Raw string pool blob (see [`StringPool::parse`]).
    pub fn string_pool(&self) -> &[u8] {
        &self.string_pool
    }

    /// Total byte length of the binary blob section.
    pub fn total_binary_bytes(&self) -> u64 {
        match &self.binaries {
            BinaryData::Sources(sources) => sources.iter().map(|s| s.size).sum(),
            BinaryData::Captured(bytes) => bytes.len() as u64,
        }
    }

    /// Iterate every overlaid value in canonical
    /// `package → type → entry → configuration` order.
    pub fn entries(&self) -> impl Iterator<Item = FabricatedEntry<'_>> {
        self.document.packages.iter().flat_map(|(package, types)| {
            types.iter().flat_map(move |(type_name, entries)| {
                entries.iter().flat_map(move |(entry, configs)| {
                    configs
                        .iter()
                        .map(move |(configuration, value)| FabricatedEntry {
                            package,
                            type_name,
                            entry,
                            configuration,
                            value: &value.value,
                            pool_index: value.pool_index,
                        })
                })
            })
        })
    }

    /// The overlay's CRC-32.
    ///
    /// For a record decoded from a current-version stream this is the
    /// stream's own CRC, trusted without recomputation. Otherwise the
    /// canonical payload is materialized and the CRC computed from it.
    pub fn crc(&self) -> Result<u32> {
        if let Some(crc) = self.crc_cache.get() {
            return Ok(*crc);
        }
        let crc = write::compute_crc(self.payload()?);
        let _ = self.crc_cache.set(crc);
        Ok(crc)
    }

    /// The canonical serialized payload, materialized on first use.
    pub(crate) fn payload(&self) -> Result<&[u8]> {
        if let Some(bytes) = self.payload_cache.get() {
            return Ok(bytes);
        }
        let bytes = payload::encode(&self.document)?;
        Ok(self.payload_cache.get_or_init(|| bytes))
    }
}
