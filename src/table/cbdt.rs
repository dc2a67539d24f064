use crate::{
    catalog::GlyphCatalog,
    error::{FontError, FontResult},
    metrics::StrikeMetrics,
    write::ByteWriter,
};

use super::TableTag;

/// CBDT/CBLC share a major.minor version of 3.0
pub(crate) const VERSION: u32 = 0x0003_0000;

/// A glyph's strike image, PNG-encoded and ready for embedding. The same
/// payload backs both the bitmap data table and the vector fallback.
#[derive(Debug)]
pub(crate) struct GlyphBitmap {
    pub glyph_index: u16,
    /// Strike pixels, not font units
    pub width: u8,
    pub height: u8,
    pub png: Vec<u8>,
}

impl GlyphBitmap {
    /// PNG-encode every real glyph's strike image, in ascending glyph
    /// index order
    pub fn from_catalog(catalog: &GlyphCatalog) -> FontResult<Vec<Self>> {
        let mut bitmaps = Vec::new();

        for glyph in catalog.real_glyphs() {
            let Some(image) = &glyph.strike_image else {
                continue;
            };

            if image.width() > 0xFF || image.height() > 0xFF {
                return Err(FontError::assembly(
                    "bitmap encoding",
                    format!(
                        "glyph {} strike image {}x{} exceeds one-byte metrics",
                        glyph.index,
                        image.width(),
                        image.height()
                    ),
                ));
            }

            let png = image
                .encode_png()
                .map_err(|err| FontError::assembly("bitmap encoding", err.to_string()))?;

            bitmaps.push(Self {
                glyph_index: glyph.index,
                width: image.width() as u8,
                height: image.height() as u8,
                png,
            });
        }

        if bitmaps.is_empty() {
            return Err(FontError::EmptyGlyphSet);
        }

        Ok(bitmaps)
    }
}

/// Five-byte metrics header preceding each image record, all quantities in
/// strike pixels. The signed fields are why the strike resolution is
/// capped at 127.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SmallGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub bearing_x: i8,
    pub bearing_y: i8,
    pub advance: u8,
}

impl SmallGlyphMetrics {
    pub fn new(bitmap: &GlyphBitmap, metrics: &StrikeMetrics) -> Self {
        Self {
            height: bitmap.height,
            width: bitmap.width,
            bearing_x: 0,
            bearing_y: metrics.strike_ascender(),
            advance: bitmap.width,
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        w.write_u8(self.height);
        w.write_u8(self.width);
        w.write_i8(self.bearing_x);
        w.write_i8(self.bearing_y);
        w.write_u8(self.advance);
    }
}

/// Encoded color-bitmap data table plus the offsets the location table
/// needs to index it.
#[derive(Debug)]
pub(crate) struct CbdtTable {
    pub data: Vec<u8>,
    /// Offset of the first image record, i.e. where the strike's image
    /// data begins
    pub image_data_offset: u32,
    /// `glyphCount + 1` offsets relative to `image_data_offset`; the final
    /// entry marks the end of the last record
    pub sbit_offsets: Vec<u32>,
}

impl CbdtTable {
    pub const TAG: TableTag = TableTag::new(*b"CBDT");

    /// Image format 17 records: small glyph metrics, a 4-byte payload
    /// length, then the raw PNG bytes.
    ///
    /// <https://learn.microsoft.com/en-us/typography/opentype/spec/cbdt>
    pub fn build(bitmaps: &[GlyphBitmap], metrics: &StrikeMetrics) -> FontResult<Self> {
        if bitmaps.is_empty() {
            return Err(FontError::EmptyGlyphSet);
        }

        let mut w = ByteWriter::new();
        w.write_u32(VERSION);

        let image_data_offset = w.len() as u32;
        let mut sbit_offsets = Vec::with_capacity(bitmaps.len() + 1);

        for bitmap in bitmaps {
            sbit_offsets.push(w.len() as u32 - image_data_offset);

            SmallGlyphMetrics::new(bitmap, metrics).encode(&mut w);
            w.write_u32(bitmap.png.len() as u32);
            w.write_bytes(&bitmap.png);
        }
        sbit_offsets.push(w.len() as u32 - image_data_offset);

        Ok(Self {
            data: w.into_bytes(),
            image_data_offset,
            sbit_offsets,
        })
    }
}
