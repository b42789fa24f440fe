//! Resource container capability traits.
//!
//! A *resource container* is anything that holds resources and can answer
//! identity questions about them. Two specializations exist:
//!
//! - [`TargetResourceContainer`] — the package being overlaid; always
//!   backed by a compiled resource table.
//! - [`OverlayResourceContainer`] — the package supplying replacement
//!   values; backed either by a compiled APK or by a fabricated overlay.
//!
//! Downstream resolution code works against these traits and never learns
//! which kind it was handed.
//!
//! Methods take `&mut self`: implementations materialize internal state
//! (zip archives, decoded tables) lazily on first use and are not
//! thread-safe by design — callers sharing a container across threads must
//! serialize access externally.

use crate::data::{OverlayData, OverlayManifestInfo};
use crate::error::Result;
use camino::Utf8Path;
use rro_core::{OverlayableInfo, ResourceId};

/// Capabilities common to both container kinds.
pub trait ResourceContainer {
    /// A fingerprint of the container's contents; changes whenever the
    /// overlay's identity-relevant files change.
    fn crc(&mut self) -> Result<u32>;

    /// The path this container was opened from.
    fn path(&self) -> &Utf8Path;

    /// Look a resource name up by id. Fails for containers that do not
    /// address resources by id.
    fn resource_name(&mut self, id: ResourceId) -> Result<String>;
}

/// A container whose resources are being overridden.
pub trait TargetResourceContainer: ResourceContainer {
    /// Whether the target declares any overlayable set.
    fn defines_overlayable(&mut self) -> Result<bool>;

    /// The overlayable set a resource belongs to, if any.
    fn overlayable_info(&mut self, id: ResourceId) -> Result<Option<OverlayableInfo>>;

    /// Look a resource id up by name.
    fn resource_id(&mut self, name: &str) -> Result<ResourceId>;
}

/// A container supplying replacement resource values.
pub trait OverlayResourceContainer: ResourceContainer {
    /// Extract the manifest-level metadata of the overlay with the given
    /// name. The empty name selects the unnamed overlay.
    fn find_overlay_info(&mut self, name: &str) -> Result<OverlayManifestInfo>;

    /// Extract the resolved mapping the overlay supplies.
    fn overlay_data(&mut self, info: &OverlayManifestInfo) -> Result<OverlayData>;
}
