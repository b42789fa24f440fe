//! Resource container abstraction over APK-backed and fabricated overlays.
//!
//! A *target* application's resources can be overridden by values supplied
//! by a separate *overlay* package. Overlays come in two kinds — compiled
//! APKs and fabricated overlay files (`rro_fabricated`) — and this crate
//! lets downstream resolution code treat them identically:
//!
//! - [`ResourceContainer`] / [`TargetResourceContainer`] /
//!   [`OverlayResourceContainer`] — the capability traits
//! - [`ApkResourceContainer`] — both roles over a compiled APK, with
//!   lazily-materialized internal state
//! - [`FabricatedOverlayContainer`] — the fabricated-backed overlay role
//! - [`open_overlay_container`] — the single dispatch point between the
//!   two overlay kinds
//!
//! The decoders for compiled resource tables and binary XML are external
//! collaborators, supplied through the [`ApkDecoder`] seam.

use camino::Utf8Path;
use std::fs::File;
use std::io::Read;

mod apk;
mod container;
mod data;
mod decoder;
mod error;
mod fabricated;
#[cfg(test)]
mod testing;

pub use apk::ApkResourceContainer;
pub use container::{OverlayResourceContainer, ResourceContainer, TargetResourceContainer};
pub use data::{
    InlineStringPoolData, OverlayData, OverlayManifestInfo, OverlayValue, OverlayValuePayload,
};
pub use decoder::{ApkDecoder, ResourceTable, XmlAttribute, XmlDocument, XmlElement};
pub use error::{ContainerError, Result};
pub use fabricated::FabricatedOverlayContainer;

/// Open an overlay container, dispatching on the file's leading bytes:
/// the fabricated-overlay magic selects the fabricated codec, anything
/// else is treated as a zip/APK. This is the only branch point between
/// the two overlay kinds; everything downstream is polymorphic.
pub fn open_overlay_container(
    path: impl AsRef<Utf8Path>,
    decoder: Box<dyn ApkDecoder>,
) -> Result<Box<dyn OverlayResourceContainer>> {
    let path = path.as_ref();
    let mut file = File::open(path.as_std_path())?;
    let mut magic = [0u8; 4];
    let read = file.read(&mut magic)?;
    drop(file);

    if read == magic.len() && magic == rro_fabricated::MAGIC {
        tracing::debug!("opening {} as a fabricated overlay", path);
        Ok(Box::new(FabricatedOverlayContainer::from_path(path)?))
    } else {
        tracing::debug!("opening {} as an apk", path);
        Ok(Box::new(ApkResourceContainer::from_path(path, decoder)))
    }
}

/// Open a target container. Targets always carry a compiled resource
/// table, so this is unconditionally APK-backed.
pub fn open_target_container(
    path: impl AsRef<Utf8Path>,
    decoder: Box<dyn ApkDecoder>,
) -> Result<Box<dyn TargetResourceContainer>> {
    Ok(Box::new(ApkResourceContainer::from_path(
        path.as_ref(),
        decoder,
    )))
}
