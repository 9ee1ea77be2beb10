// Channel blob decoding: base64 text wrapping a zlib stream

use crate::core::error::{AdibinError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Decode one row's compressed channel description into raw JSON bytes.
pub fn inflate_blob(blob: &str) -> Result<Vec<u8>> {
    let compressed = STANDARD.decode(blob)?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| AdibinError::DecompressionFailed(format!("Zlib: {}", e)))?;
    Ok(decompressed)
}
