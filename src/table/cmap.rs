use std::collections::BTreeMap;

use crate::write::ByteWriter;

use super::TableTag;

pub(crate) const TAG: TableTag = TableTag::new(*b"cmap");

const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_BMP_ENCODING: u16 = 1;
const WINDOWS_FULL_ENCODING: u16 = 10;

/// Character map: a format 4 subtable for BMP codepoints plus a format 12
/// subtable covering the whole repertoire, emoji being mostly
/// supplementary-plane.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/cmap>
pub(crate) fn build(codepoint_map: &BTreeMap<u32, u16>) -> Vec<u8> {
    // BTreeMap iteration gives the entries in ascending codepoint order
    let entries = codepoint_map
        .iter()
        .map(|(&code, &glyph)| (code, glyph))
        .collect::<Vec<_>>();

    let bmp = entries
        .iter()
        .filter(|&&(code, _)| code < 0xFFFF)
        .map(|&(code, glyph)| (code as u16, glyph))
        .collect::<Vec<_>>();

    let format4 = encode_format4(&bmp);
    let format12 = encode_format12(&entries);

    let mut w = ByteWriter::new();

    w.write_u16(0); // version
    w.write_u16(2); // numTables

    let records_end = 4 + 2 * 8;
    w.write_u16(WINDOWS_PLATFORM);
    w.write_u16(WINDOWS_BMP_ENCODING);
    w.write_u32(records_end as u32);
    w.write_u16(WINDOWS_PLATFORM);
    w.write_u16(WINDOWS_FULL_ENCODING);
    w.write_u32((records_end + format4.len()) as u32);

    w.write_bytes(&format4);
    w.write_bytes(&format12);

    w.into_bytes()
}

/// Maximal runs of consecutive codepoints, each with its glyph ids
fn bmp_segments(bmp: &[(u16, u16)]) -> Vec<(u16, u16, Vec<u16>)> {
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();

    for &(code, glyph) in bmp {
        match segments.last_mut() {
            Some((_, end, glyphs)) if *end + 1 == code => {
                *end = code;
                glyphs.push(glyph);
            }
            _ => segments.push((code, code, vec![glyph])),
        }
    }

    segments
}

fn encode_format4(bmp: &[(u16, u16)]) -> Vec<u8> {
    let segments = bmp_segments(bmp);

    // real segments plus the required 0xFFFF sentinel
    let seg_count = segments.len() as u16 + 1;
    let glyph_id_count = bmp.len();
    let length = 16 + 8 * usize::from(seg_count) + 2 * glyph_id_count;

    let largest_pow2 = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 * (1 << largest_pow2);

    let mut w = ByteWriter::new();

    w.write_u16(4); // format
    w.write_u16(length as u16);
    w.write_u16(0); // language
    w.write_u16(seg_count * 2);
    w.write_u16(search_range);
    w.write_u16(largest_pow2); // entrySelector
    w.write_u16(seg_count * 2 - search_range); // rangeShift

    for &(_, end, _) in &segments {
        w.write_u16(end);
    }
    w.write_u16(0xFFFF);
    w.write_u16(0); // reservedPad
    for &(start, _, _) in &segments {
        w.write_u16(start);
    }
    w.write_u16(0xFFFF);

    // every real segment indexes into glyphIdArray via idRangeOffset; the
    // sentinel uses the delta form to map 0xFFFF to the undefined glyph
    for _ in &segments {
        w.write_i16(0); // idDelta
    }
    w.write_i16(1);

    // idRangeOffset[i] is a byte distance from its own location to the
    // segment's first glyphIdArray entry
    let mut glyph_ids_written = 0u16;
    for (i, (_, _, glyphs)) in segments.iter().enumerate() {
        let distance = (seg_count - i as u16) + glyph_ids_written;
        w.write_u16(distance * 2);
        glyph_ids_written += glyphs.len() as u16;
    }
    w.write_u16(0);

    for (_, _, glyphs) in &segments {
        for &glyph in glyphs {
            w.write_u16(glyph);
        }
    }

    debug_assert_eq!(w.len(), length);

    w.into_bytes()
}

fn encode_format12(entries: &[(u32, u16)]) -> Vec<u8> {
    // maximal runs where codepoint and glyph id advance in lockstep
    let mut groups: Vec<(u32, u32, u32)> = Vec::new();
    for &(code, glyph) in entries {
        match groups.last_mut() {
            Some((start, end, start_glyph))
                if *end + 1 == code && *start_glyph + (code - *start) == u32::from(glyph) =>
            {
                *end = code;
            }
            _ => groups.push((code, code, u32::from(glyph))),
        }
    }

    let mut w = ByteWriter::new();

    w.write_u16(12); // format
    w.write_u16(0); // reserved
    w.write_u32(16 + 12 * groups.len() as u32); // length
    w.write_u32(0); // language
    w.write_u32(groups.len() as u32);

    for (start, end, start_glyph) in groups {
        w.write_u32(start);
        w.write_u32(end);
        w.write_u32(start_glyph);
    }

    w.into_bytes()
}
