use crate::{
    error::{FontError, FontResult},
    metrics::StrikeMetrics,
    write::ByteWriter,
};

use super::{
    cbdt::{CbdtTable, GlyphBitmap, VERSION},
    TableTag,
};

pub(crate) const TAG: TableTag = TableTag::new(*b"CBLC");

const BITMAP_SIZE_LEN: u32 = 48;
const INDEX_SUBTABLE_ARRAY_ENTRY_LEN: u32 = 8;
const INDEX_SUBTABLE_HEADER_LEN: u32 = 8;

/// offset array per glyph
const INDEX_FORMAT_OFFSET_ARRAY: u16 = 1;
/// small metrics + 4-byte length + raw PNG payload
const IMAGE_FORMAT_PNG: u16 = 17;

const BIT_DEPTH_RGBA: u8 = 32;
const FLAG_HORIZONTAL_METRICS: u8 = 0x01;

/// Line metrics for one text direction, single-byte quantities in strike
/// pixels; caret and sidebearing extrema are unused here and stay zero
#[derive(Debug, Clone, Copy)]
pub(crate) struct SbitLineMetrics {
    pub ascender: i8,
    pub descender: i8,
    pub width_max: u8,
}

impl SbitLineMetrics {
    pub fn encode(&self, w: &mut ByteWriter) {
        w.write_i8(self.ascender);
        w.write_i8(self.descender);
        w.write_u8(self.width_max);
        w.write_i8(0); // caretSlopeNumerator
        w.write_i8(0); // caretSlopeDenominator
        w.write_i8(0); // caretOffset
        w.write_i8(0); // minOriginSB
        w.write_i8(0); // minAdvanceSB
        w.write_i8(0); // maxBeforeBL
        w.write_i8(0); // minAfterBL
        w.write_i8(0); // pad1
        w.write_i8(0); // pad2
    }
}

/// Color-bitmap location table: one strike, one bitmap-size record, one
/// format 1 index subtable whose offset array delimits every image record
/// in the data table.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/cblc>
pub(crate) fn build(
    bitmaps: &[GlyphBitmap],
    metrics: &StrikeMetrics,
    cbdt: &CbdtTable,
) -> FontResult<Vec<u8>> {
    let Some((first, last)) = bitmaps
        .first()
        .zip(bitmaps.last())
        .map(|(a, b)| (a.glyph_index, b.glyph_index))
    else {
        return Err(FontError::EmptyGlyphSet);
    };

    // consumers binary-search the declared range, so a gap or out-of-order
    // entry corrupts every lookup
    let contiguous = bitmaps
        .windows(2)
        .all(|pair| pair[0].glyph_index + 1 == pair[1].glyph_index);
    if !contiguous {
        return Err(FontError::assembly(
            "bitmap index",
            format!("glyph range {}..={} is not contiguous", first, last),
        ));
    }

    if cbdt.sbit_offsets.len() != bitmaps.len() + 1 {
        return Err(FontError::assembly(
            "bitmap index",
            format!(
                "offset array has {} entries for {} glyphs",
                cbdt.sbit_offsets.len(),
                bitmaps.len()
            ),
        ));
    }

    // declared ppem and max-width are the floor-divided mean of the strike
    // image dimensions
    let count = bitmaps.len() as u32;
    let avg_width = (bitmaps.iter().map(|b| u32::from(b.width)).sum::<u32>() / count) as u8;
    let avg_height = (bitmaps.iter().map(|b| u32::from(b.height)).sum::<u32>() / count) as u8;

    let line_metrics = SbitLineMetrics {
        ascender: metrics.strike_ascender(),
        descender: metrics.strike_descender(),
        width_max: avg_width,
    };

    let num_strikes = 1u32;
    let index_subtable_array_offset = 8 + BITMAP_SIZE_LEN * num_strikes;
    let index_tables_size = INDEX_SUBTABLE_ARRAY_ENTRY_LEN
        + INDEX_SUBTABLE_HEADER_LEN
        + (count + 1) * 4;

    let mut w = ByteWriter::new();

    w.write_u32(VERSION);
    w.write_u32(num_strikes);

    // bitmap-size record
    w.write_u32(index_subtable_array_offset);
    w.write_u32(index_tables_size);
    w.write_u32(1); // numberOfIndexSubtables
    w.write_u32(0); // colorRef
    line_metrics.encode(&mut w); // hori
    line_metrics.encode(&mut w); // vert
    w.write_u16(first);
    w.write_u16(last);
    w.write_u8(avg_width); // ppemX
    w.write_u8(avg_height); // ppemY
    w.write_u8(BIT_DEPTH_RGBA);
    w.write_u8(FLAG_HORIZONTAL_METRICS);

    debug_assert_eq!(w.len() as u32, index_subtable_array_offset);

    // index subtable array: one entry pointing just past itself
    w.write_u16(first);
    w.write_u16(last);
    w.write_u32(INDEX_SUBTABLE_ARRAY_ENTRY_LEN);

    // index subtable header
    w.write_u16(INDEX_FORMAT_OFFSET_ARRAY);
    w.write_u16(IMAGE_FORMAT_PNG);
    w.write_u32(cbdt.image_data_offset);

    for &offset in &cbdt.sbit_offsets {
        w.write_u32(offset);
    }

    Ok(w.into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        catalog::{GlyphCatalog, SymbolCapture},
        raster::Raster,
    };

    fn strike() -> (Vec<GlyphBitmap>, CbdtTable) {
        let image = Raster::solid(127, 127, [255, 200, 0, 255])
            .encode_png()
            .unwrap();
        let captures = [
            SymbolCapture::new("\u{1F600}", image.clone()),
            SymbolCapture::new("\u{1F601}", image),
        ];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();
        let bitmaps = GlyphBitmap::from_catalog(&catalog).unwrap();
        let cbdt = CbdtTable::build(&bitmaps, &StrikeMetrics::default()).unwrap();

        (bitmaps, cbdt)
    }

    #[test]
    fn header_and_bitmap_size_record() {
        let (bitmaps, cbdt) = strike();
        let data = build(&bitmaps, &StrikeMetrics::default(), &cbdt).unwrap();

        assert_eq!(&data[0..4], &0x0003_0000u32.to_be_bytes());
        assert_eq!(&data[4..8], &1u32.to_be_bytes()); // one strike
        assert_eq!(&data[8..12], &56u32.to_be_bytes()); // array offset
        // index tables size: entry + header + 3 offsets
        assert_eq!(&data[12..16], &(8u32 + 8 + 12).to_be_bytes());

        // hori line metrics
        assert_eq!(data[24] as i8, 102);
        assert_eq!(data[25] as i8, -25);
        assert_eq!(data[26], 127);

        // glyph range, ppem, depth, flags
        assert_eq!(&data[48..50], &1u16.to_be_bytes());
        assert_eq!(&data[50..52], &2u16.to_be_bytes());
        assert_eq!(data[52], 127);
        assert_eq!(data[53], 127);
        assert_eq!(data[54], BIT_DEPTH_RGBA);
        assert_eq!(data[55], FLAG_HORIZONTAL_METRICS);
    }

    #[test]
    fn index_subtable_points_into_the_data_table() {
        let (bitmaps, cbdt) = strike();
        let data = build(&bitmaps, &StrikeMetrics::default(), &cbdt).unwrap();

        // array entry at 56: first, last, additional offset
        assert_eq!(&data[56..58], &1u16.to_be_bytes());
        assert_eq!(&data[58..60], &2u16.to_be_bytes());
        assert_eq!(&data[60..64], &8u32.to_be_bytes());

        // header: format 1, image format 17, image data offset
        assert_eq!(&data[64..66], &1u16.to_be_bytes());
        assert_eq!(&data[66..68], &17u16.to_be_bytes());
        assert_eq!(&data[68..72], &cbdt.image_data_offset.to_be_bytes());

        // offset array mirrors the data table
        let offsets = data[72..]
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes(c.try_into().unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(offsets, cbdt.sbit_offsets);
        assert_eq!(
            *offsets.last().unwrap() as usize + cbdt.image_data_offset as usize,
            cbdt.data.len()
        );
    }

    #[test]
    fn total_length_matches_declared_sizes() {
        let (bitmaps, cbdt) = strike();
        let data = build(&bitmaps, &StrikeMetrics::default(), &cbdt).unwrap();

        let declared = u32::from_be_bytes(data[12..16].try_into().unwrap());
        assert_eq!(data.len() as u32, 56 + declared);
    }
}
