//! Error types for fabricated overlay operations.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FabricatedOverlayError>;

/// Errors that can occur while building, reading, or writing a fabricated
/// overlay.
#[derive(Error, Debug)]
pub enum FabricatedOverlayError {
    /// Stream or filesystem I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not start with the fabricated overlay magic.
    #[error("not a fabricated overlay file (magic 0x{0:08x})")]
    InvalidMagic(u32),

    /// The stream's version is outside the supported range.
    #[error("unsupported fabricated overlay version {0}")]
    UnsupportedVersion(u32),

    /// The structured payload could not be decoded.
    #[error("malformed overlay payload: {0}")]
    PayloadDecode(#[from] rmp_serde::decode::Error),

    /// The structured payload could not be encoded.
    #[error("failed to encode overlay payload: {0}")]
    PayloadEncode(#[from] rmp_serde::encode::Error),

    /// A resource name passed to the builder could not be parsed.
    #[error(transparent)]
    Name(#[from] rro_core::NameError),

    /// An external binary source could not be stat'd or read.
    #[error("cannot read binary resource data from '{path}': {source}")]
    BinarySource {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// An external binary source changed size between build and write.
    #[error("binary resource data at '{path}' is shorter than its recorded {expected} bytes")]
    BinarySourceTruncated { path: Utf8PathBuf, expected: u64 },

    /// Binary resource values were supplied without a destination path for
    /// their `frro:/` URIs.
    #[error("binary resource values require the overlay path to be set first")]
    MissingFrroPath,

    /// The string pool blob is truncated or not valid UTF-8.
    #[error("malformed string pool: {0}")]
    MalformedStringPool(String),
}
