//! Overlay metadata and extracted overlay data.

use rro_core::{ResourceId, TargetValueWithConfig};

/// Manifest-level description of one overlay, extracted from a compiled
/// `AndroidManifest.xml` or synthesized from a fabricated overlay's
/// identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayManifestInfo {
    /// Package name of the overlay itself.
    pub package_name: String,
    /// Overlay identifier; empty for the unnamed overlay.
    pub name: String,
    /// Package whose resources are overridden.
    pub target_package: String,
    /// Optional overlayable-set name within the target.
    pub target_name: Option<String>,
    /// Resource id of the overlay's resource-map document; `None` for a
    /// legacy whole-package overlay.
    pub resource_mapping: Option<ResourceId>,
}

/// The resolved mapping an overlay supplies, consumed by a downstream
/// resolver. Values keep their insertion order; duplicates are not
/// collapsed at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayData {
    pub values: Vec<OverlayValue>,
    pub string_pool: Option<InlineStringPoolData>,
}

/// One overlaid resource: the target's name plus the supplied payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayValue {
    pub resource_name: String,
    pub payload: OverlayValuePayload,
}

/// What an overlay supplies for a target resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayValuePayload {
    /// The overlaid value is itself a resource reference.
    Reference {
        overlay_id: ResourceId,
        /// When set, the reference points into the overlay's own package
        /// and must be translated at resolution time rather than used
        /// as-is.
        rewrite_id: bool,
    },
    /// The overlaid value is a literal.
    Inline(TargetValueWithConfig),
}

/// Raw string-pool bytes carried alongside an [`OverlayData`] so that
/// string-typed values resolve without a separate lookup into the
/// overlay's compiled tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStringPoolData {
    pub data: Vec<u8>,
    /// Index offset keeping this pool's string indices from colliding with
    /// the overlay's own compiled string pool when both are consulted
    /// together.
    pub offset: u32,
}
