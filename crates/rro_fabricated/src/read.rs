//! Deserialization of fabricated overlays.

use crate::error::{FabricatedOverlayError, Result};
use crate::{
    payload, BinaryData, FabricatedOverlay, CURRENT_VERSION, MAGIC, OLDEST_SUPPORTED_VERSION,
};
use byteorder::{ReadBytesExt, LE};
use std::cell::OnceCell;
use std::io::Read;

impl FabricatedOverlay {
    /// Decode a fabricated overlay from a stream.
    ///
    /// Versions [`OLDEST_SUPPORTED_VERSION`]..=[`CURRENT_VERSION`] are
    /// accepted; anything else is rejected rather than guessed at. Version
    /// 1 carries neither blob section nor string pool, version 2 adds the
    /// pool, version 3 adds the blob section ahead of the pool.
    ///
    /// The stored CRC is trusted (cached without recomputation) only when
    /// the stream is already at the current version — re-serializing such
    /// a record is byte-identical. Older records recompute their CRC from
    /// the decoded content on first demand, since their next serialization
    /// may differ from what was read.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let magic = reader.read_u32::<LE>()?;
        if magic != u32::from_le_bytes(MAGIC) {
            return Err(FabricatedOverlayError::InvalidMagic(magic));
        }

        let version = reader.read_u32::<LE>()?;
        if !(OLDEST_SUPPORTED_VERSION..=CURRENT_VERSION).contains(&version) {
            return Err(FabricatedOverlayError::UnsupportedVersion(version));
        }

        let crc = reader.read_u32::<LE>()?;

        let binary_blob = if version >= 3 {
            let total_binary_bytes = reader.read_u32::<LE>()?;
            let mut blob = vec![0u8; total_binary_bytes as usize];
            reader.read_exact(&mut blob)?;
            blob
        } else {
            Vec::new()
        };

        let string_pool = if version >= 2 {
            let length = reader.read_u32::<LE>()?;
            let mut pool = vec![0u8; length as usize];
            reader.read_exact(&mut pool)?;
            pool
        } else {
            Vec::new()
        };

        let mut payload_bytes = Vec::new();
        reader.read_to_end(&mut payload_bytes)?;
        let document = payload::decode(&payload_bytes)?;

        let overlay = Self {
            document,
            string_pool,
            binaries: BinaryData::Captured(binary_blob),
            payload_cache: OnceCell::new(),
            crc_cache: OnceCell::new(),
        };
        if version == CURRENT_VERSION {
            let _ = overlay.payload_cache.set(payload_bytes);
            let _ = overlay.crc_cache.set(crc);
        }
        Ok(overlay)
    }
}
