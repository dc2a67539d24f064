use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};

/// Below the encoder's default of 6: roughly an order of magnitude faster
/// to encode for a low single-digit percent size increase
pub const DEFAULT_QUALITY: u32 = 5;

/// Compress a serialized font document into the distributable artifact.
///
/// The delivery container is an external concern; this seam only promises
/// `compress(bytes, quality) -> bytes` over a zlib stream.
pub fn compress_artifact(bytes: &[u8], quality: u32) -> anyhow::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(quality));
    encoder.write_all(bytes)?;

    Ok(encoder.finish()?)
}
