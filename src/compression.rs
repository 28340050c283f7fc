//! (De)compression support for uploaded tables.

use crate::error::FuncTreeError;
use crate::models;

use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;

/// Decompresses some bytes and returns the uncompressed data.
///
/// # Arguments
///
/// * `compression`: Compression algorithm
/// * `data`: Compressed data
pub fn decompress(
    compression: models::Compression,
    data: &[u8],
) -> Result<Vec<u8>, FuncTreeError> {
    match compression {
        models::Compression::Gzip => decompress_flate2_gzip(data),
        models::Compression::Zlib => decompress_flate2_zlib(data),
    }
}

fn decompress_flate2_gzip(data: &[u8]) -> Result<Vec<u8>, FuncTreeError> {
    let mut decoder = GzDecoder::new(data);
    // Text tables compress well, so start from a generous guess.
    let mut buf = Vec::with_capacity(data.len() * 4);
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}

fn decompress_flate2_zlib(data: &[u8]) -> Result<Vec<u8>, FuncTreeError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut buf = Vec::with_capacity(data.len() * 4);
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}
