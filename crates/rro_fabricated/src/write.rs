//! Serialization of fabricated overlays.

use crate::error::{FabricatedOverlayError, Result};
use crate::{BinaryData, FabricatedOverlay, CURRENT_VERSION, MAGIC};
use byteorder::{WriteBytesExt, LE};
use std::fs::File;
use std::io::{self, Read, Write};

/// CRC-32 of the current format version followed by the canonical payload.
///
/// The version is folded in so that a payload cannot masquerade as one of a
/// different format generation.
pub(crate) fn compute_crc(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&CURRENT_VERSION.to_le_bytes());
    hasher.update(payload);
    hasher.finalize()
}

impl FabricatedOverlay {
    /// Serialize the overlay, always emitting the current format version.
    ///
    /// The payload and CRC are materialized (and cached) if they were not
    /// already. For a freshly built overlay the blob section is streamed
    /// from the recorded source files; for a decoded one the captured
    /// bytes are written back verbatim, so a same-version load-then-save
    /// reproduces its input byte for byte. Any I/O failure aborts.
    pub fn to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let crc = self.crc()?;

        writer.write_all(&MAGIC)?;
        writer.write_u32::<LE>(CURRENT_VERSION)?;
        writer.write_u32::<LE>(crc)?;

        writer.write_u32::<LE>(self.total_binary_bytes() as u32)?;
        match &self.binaries {
            BinaryData::Sources(sources) => {
                for source in sources {
                    let file = File::open(source.path.as_std_path()).map_err(|e| {
                        FabricatedOverlayError::BinarySource {
                            path: source.path.clone(),
                            source: e,
                        }
                    })?;
                    let copied = io::copy(&mut file.take(source.size), writer)?;
                    if copied != source.size {
                        return Err(FabricatedOverlayError::BinarySourceTruncated {
                            path: source.path.clone(),
                            expected: source.size,
                        });
                    }
                }
            }
            BinaryData::Captured(bytes) => writer.write_all(bytes)?,
        }

        writer.write_u32::<LE>(self.string_pool.len() as u32)?;
        writer.write_all(&self.string_pool)?;

        writer.write_all(self.payload()?)?;
        Ok(())
    }
}
