use std::collections::BTreeMap;

use crate::{metrics::StrikeMetrics, write::ByteWriter};

use super::TableTag;

pub(crate) const TAG: TableTag = TableTag::new(*b"OS/2");

const REGULAR: u16 = 0x0040; // fsSelection

/// OS/2 and Windows metrics, version 4.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/os2>
pub(crate) fn build(metrics: &StrikeMetrics, codepoint_map: &BTreeMap<u32, u16>) -> Vec<u8> {
    let upem = i32::from(metrics.units_per_em);
    // subscript/superscript/strikeout defaults, expressed per mille of the em
    let per_mille = |v: i32| (v * upem / 1000) as i16;

    let first_char = codepoint_map.keys().next().copied().unwrap_or(0);
    let last_char = codepoint_map.keys().next_back().copied().unwrap_or(0);

    let mut w = ByteWriter::new();

    w.write_u16(4); // version
    w.write_i16(metrics.units_per_em as i16); // xAvgCharWidth, every advance is one em
    w.write_u16(400); // usWeightClass
    w.write_u16(5); // usWidthClass
    w.write_u16(0); // fsType, installable embedding
    w.write_i16(per_mille(650)); // ySubscriptXSize
    w.write_i16(per_mille(600)); // ySubscriptYSize
    w.write_i16(0); // ySubscriptXOffset
    w.write_i16(per_mille(75)); // ySubscriptYOffset
    w.write_i16(per_mille(650)); // ySuperscriptXSize
    w.write_i16(per_mille(600)); // ySuperscriptYSize
    w.write_i16(0); // ySuperscriptXOffset
    w.write_i16(per_mille(350)); // ySuperscriptYOffset
    w.write_i16(per_mille(50)); // yStrikeoutSize
    w.write_i16(per_mille(300)); // yStrikeoutPosition
    w.write_i16(0); // sFamilyClass
    w.write_bytes(&[0; 10]); // panose
    for _ in 0..4 {
        w.write_u32(0); // ulUnicodeRange1..4
    }
    w.write_bytes(b"NONE"); // achVendID
    w.write_u16(REGULAR); // fsSelection
    w.write_u16(first_char.min(0xFFFF) as u16); // usFirstCharIndex
    w.write_u16(last_char.min(0xFFFF) as u16); // usLastCharIndex
    w.write_i16(metrics.ascent); // sTypoAscender
    w.write_i16(metrics.descent); // sTypoDescender
    w.write_i16(0); // sTypoLineGap
    w.write_u16(metrics.ascent as u16); // usWinAscent
    w.write_u16((-metrics.descent) as u16); // usWinDescent
    w.write_u32(0); // ulCodePageRange1
    w.write_u32(0); // ulCodePageRange2
    w.write_i16(0); // sxHeight
    w.write_i16(metrics.ascent); // sCapHeight
    w.write_u16(0); // usDefaultChar
    w.write_u16(0x20); // usBreakChar
    w.write_u16(0); // usMaxContext

    w.into_bytes()
}
