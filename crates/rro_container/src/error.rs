//! Error types for container operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses
//! [`ContainerError`] as the error type. Errors from the `zip` crate and
//! from `rro_fabricated` are converted via `From` impls.

use camino::Utf8PathBuf;
use rro_core::ResourceId;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Errors that can occur while opening or querying a resource container.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Filesystem or stream I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The APK archive could not be opened or an entry is missing.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The fabricated overlay codec rejected the file.
    #[error("fabricated overlay error: {0}")]
    Fabricated(#[from] rro_fabricated::FabricatedOverlayError),

    /// The compiled manifest does not have the expected shape.
    #[error("malformed manifest: {0}")]
    MalformedManifest(String),

    /// The overlay-mapping document does not have the expected shape.
    #[error("malformed resource mapping: {0}")]
    MalformedResourceMapping(String),

    /// No `<overlay>` element with the requested name exists.
    #[error("no overlay named '{name}' in {path}")]
    OverlayNotFound { name: String, path: Utf8PathBuf },

    /// A resource name has no id in the compiled table.
    #[error("resource '{0}' not found")]
    ResourceNotFound(String),

    /// A resource id has no entry in the compiled table.
    #[error("resource {0} not found")]
    ResourceIdNotFound(ResourceId),

    /// The container does not address resources by id at all.
    #[error("container has no id-addressable resources (requested {0})")]
    NoIdResources(ResourceId),

    /// An external decoder (resource table or binary XML) failed.
    #[error("decoder error: {0}")]
    Decoder(String),
}
