use crate::{
    catalog::{GlyphCatalog, SymbolCapture},
    compress::compress_artifact,
    error::{FontError, FontResult},
    metrics::StrikeMetrics,
    outline::StubOutline,
    table::{
        cblc, cmap, hmtx, name, os2, post, svg, CbdtTable, DirectoryTableEntry, GlyfTable,
        GlyphBitmap, Head, Hhea, LocaTable, Maxp, OffsetSubtable, TableTag,
    },
    write::ByteWriter,
};

/// The font checksum is adjusted so the whole file sums to this constant
const CHECKSUM_TARGET: u32 = 0xB1B0_AFBA;

/// A fully assembled font: the glyph catalog plus every encoded table.
///
/// Built fresh per export and immutable once serialized; nothing is
/// retained across builds.
#[derive(Debug)]
pub struct FontDocument {
    family_name: String,
    metrics: StrikeMetrics,
    catalog: GlyphCatalog,
    /// Physical table order; the directory is sorted by tag independently
    tables: Vec<(TableTag, Vec<u8>)>,
}

/// Assemble a complete font from the caller's captures.
///
/// All-or-nothing: either every table builds and a document comes back, or
/// the first structural failure aborts the build. Per-capture raster
/// problems were already isolated by the catalog and only skip that glyph.
pub fn build_font(captures: &[SymbolCapture], family_name: &str) -> FontResult<FontDocument> {
    let metrics = StrikeMetrics::default();

    log::info!(
        "building font {:?} from {} captures",
        family_name,
        captures.len()
    );

    let catalog = GlyphCatalog::build(captures, &metrics)?;
    let glyph_count = catalog.glyph_count();

    let bitmaps = GlyphBitmap::from_catalog(&catalog)?;

    let outline = StubOutline::new(&metrics);
    let glyf = GlyfTable::build(glyph_count, &outline);
    let loca = LocaTable::from_glyf(&glyf);

    let cbdt = CbdtTable::build(&bitmaps, &metrics)?;
    let cblc = cblc::build(&bitmaps, &metrics, &cbdt)?;

    let mut tables = vec![
        (Head::TAG, Head::new(&metrics).encode()),
        (Hhea::TAG, Hhea::new(&metrics, glyph_count).encode()),
        (
            Maxp::TAG,
            Maxp {
                num_glyphs: glyph_count,
            }
            .encode(),
        ),
        (os2::TAG, os2::build(&metrics, catalog.codepoint_map())),
        (hmtx::TAG, hmtx::build(glyph_count, metrics.units_per_em)),
        (cmap::TAG, cmap::build(catalog.codepoint_map())),
        (LocaTable::TAG, loca.encode()),
        (GlyfTable::TAG, glyf.data),
        (name::TAG, name::build(family_name)),
        (post::TAG, post::build(catalog.glyphs())),
        (CbdtTable::TAG, cbdt.data),
        (cblc::TAG, cblc),
    ];

    if let Some(svg) = svg::build(&bitmaps, &metrics) {
        tables.push((svg::TAG, svg));
    }

    log::info!(
        "assembled {} tables for {} glyphs",
        tables.len(),
        glyph_count
    );

    Ok(FontDocument {
        family_name: family_name.to_owned(),
        metrics,
        catalog,
        tables,
    })
}

/// Serialize and hand the result to the compression transform
pub fn export_artifact(document: &FontDocument, quality: u32) -> FontResult<Vec<u8>> {
    let bytes = document.to_bytes()?;

    compress_artifact(&bytes, quality)
        .map_err(|err| FontError::assembly("compression", err.to_string()))
}

impl FontDocument {
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn metrics(&self) -> &StrikeMetrics {
        &self.metrics
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.catalog
    }

    pub fn table(&self, tag: TableTag) -> Option<&[u8]> {
        self.tables
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, data)| data.as_slice())
    }

    /// Serialize into the sfnt container: offset subtable, directory
    /// entries sorted by tag, then each table padded to a 4-byte boundary,
    /// with the header's checksum adjustment patched in last.
    pub fn to_bytes(&self) -> FontResult<Vec<u8>> {
        if self.tables.is_empty() {
            return Err(FontError::assembly("serialization", "no tables to write"));
        }

        let directory_len = 12 + 16 * self.tables.len();

        let mut entries = Vec::with_capacity(self.tables.len());
        let mut offset = directory_len as u32;
        for (tag, data) in &self.tables {
            entries.push(DirectoryTableEntry {
                tag: *tag,
                checksum: table_checksum(data),
                offset,
                length: data.len() as u32,
            });
            offset += padded_len(data.len()) as u32;
        }

        let mut w = ByteWriter::new();

        OffsetSubtable::new(self.tables.len() as u16).encode(&mut w);

        let mut directory = entries.iter().collect::<Vec<_>>();
        directory.sort_by_key(|entry| entry.tag);
        for entry in directory {
            entry.encode(&mut w);
        }

        for ((_, data), entry) in self.tables.iter().zip(&entries) {
            if w.len() != entry.offset as usize {
                return Err(FontError::assembly(
                    "serialization",
                    format!(
                        "table {:?} landed at {} instead of declared offset {}",
                        entry.tag,
                        w.len(),
                        entry.offset
                    ),
                ));
            }
            w.write_bytes(data);
            w.pad_to(4);
        }

        let mut bytes = w.into_bytes();

        // whole-font checksum is computed while checkSumAdjustment is zero
        let adjustment = CHECKSUM_TARGET.wrapping_sub(table_checksum(&bytes));
        let head = entries
            .iter()
            .find(|entry| entry.tag == Head::TAG)
            .ok_or_else(|| FontError::assembly("serialization", "head table missing"))?;
        let patch = head.offset as usize + Head::CHECKSUM_ADJUSTMENT_OFFSET;
        bytes[patch..patch + 4].copy_from_slice(&adjustment.to_be_bytes());

        Ok(bytes)
    }
}

/// Sum of big-endian u32 words, the tail zero-padded
fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::raster::Raster;

    fn capture(grapheme: &str, size: u32) -> SymbolCapture {
        let image = Raster::solid(size, size, [255, 200, 0, 255])
            .encode_png()
            .unwrap();
        SymbolCapture::new(grapheme, image)
    }

    fn sample_font() -> FontDocument {
        let captures = [capture("\u{1F600}", 127), capture("\u{1F601}", 127)];
        build_font(&captures, "Test").unwrap()
    }

    #[test]
    fn contains_bitmap_and_vector_tables() {
        let font = sample_font();

        for tag in [
            *b"head", *b"hhea", *b"maxp", *b"OS/2", *b"hmtx", *b"cmap", *b"loca", *b"glyf",
            *b"name", *b"post", *b"CBDT", *b"CBLC", *b"SVG ",
        ] {
            assert!(
                font.table(TableTag::new(tag)).is_some(),
                "missing table {:?}",
                TableTag::new(tag)
            );
        }

        assert_eq!(font.catalog().glyph_count(), 3); // 2 glyphs + .notdef
    }

    #[test]
    fn declared_bitmap_size_is_the_strike_resolution() {
        let font = sample_font();
        let cbdt = font.table(CbdtTable::TAG).unwrap();

        // first record follows the 4-byte version: height, width
        assert_eq!(cbdt[4], 127);
        assert_eq!(cbdt[5], 127);
    }

    #[test]
    fn oversized_captures_are_resampled_to_the_strike() {
        let captures = [capture("\u{1F600}", 512)];
        let font = build_font(&captures, "Test").unwrap();
        let cbdt = font.table(CbdtTable::TAG).unwrap();

        assert_eq!(cbdt[4], 127);
        assert_eq!(cbdt[5], 127);
    }

    #[test]
    fn em_height_equals_advance_for_every_glyph() {
        let font = sample_font();
        let metrics = font.metrics();
        let em_height = metrics.ascent - metrics.descent;

        let hmtx = font.table(hmtx::TAG).unwrap();
        assert_eq!(hmtx.len(), 3 * 4);
        for metric in hmtx.chunks_exact(4) {
            let advance = u16::from_be_bytes([metric[0], metric[1]]);
            assert_eq!(i32::from(em_height), i32::from(advance));
        }
    }

    #[test]
    fn empty_capture_set_is_rejected() {
        let err = build_font(&[], "Test").unwrap_err();

        assert!(matches!(err, FontError::EmptyGlyphSet));
    }

    #[test]
    fn directory_is_sorted_with_valid_offsets() {
        let font = sample_font();
        let bytes = font.to_bytes().unwrap();

        let num_tables = u16::from_be_bytes([bytes[4], bytes[5]]) as usize;
        assert_eq!(num_tables, 13);

        let mut previous_tag = [0u8; 4];
        for i in 0..num_tables {
            let base = 12 + i * 16;
            let tag: [u8; 4] = bytes[base..base + 4].try_into().unwrap();
            assert!(tag > previous_tag, "directory not sorted at {:?}", tag);
            previous_tag = tag;

            let offset =
                u32::from_be_bytes(bytes[base + 8..base + 12].try_into().unwrap()) as usize;
            let length =
                u32::from_be_bytes(bytes[base + 12..base + 16].try_into().unwrap()) as usize;
            assert!(offset % 4 == 0);
            assert!(offset + length <= bytes.len());
        }
    }

    #[test]
    fn whole_font_checksum_balances() {
        let font = sample_font();
        let bytes = font.to_bytes().unwrap();

        assert_eq!(table_checksum(&bytes), CHECKSUM_TARGET);
    }

    #[test]
    fn export_artifact_is_decompressible() {
        use std::io::Read;

        let font = sample_font();
        let bytes = font.to_bytes().unwrap();
        let artifact = export_artifact(&font, crate::compress::DEFAULT_QUALITY).unwrap();

        let mut decompressed = Vec::new();
        flate2::read::ZlibDecoder::new(artifact.as_slice())
            .read_to_end(&mut decompressed)
            .unwrap();
        assert_eq!(decompressed, bytes);
    }

    #[test]
    fn cbdt_record_round_trips_to_the_strike_png() {
        let font = sample_font();
        let cbdt = font.table(CbdtTable::TAG).unwrap();

        let strike = font.catalog().real_glyphs()[0]
            .strike_image
            .as_ref()
            .unwrap();
        let expected = strike.encode_png().unwrap();

        let length = u32::from_be_bytes(cbdt[9..13].try_into().unwrap()) as usize;
        assert_eq!(length, expected.len());
        assert_eq!(&cbdt[13..13 + length], expected.as_slice());
    }
}
