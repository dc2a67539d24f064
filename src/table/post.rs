use crate::{catalog::GlyphRecord, write::ByteWriter};

use super::TableTag;

pub(crate) const TAG: TableTag = TableTag::new(*b"post");

/// Index of the first non-standard name; indices below this refer to the
/// standard Macintosh glyph name set, where `.notdef` is entry 0
const FIRST_CUSTOM_NAME: u16 = 258;

/// PostScript glyph naming, version 2.0: the deterministic per-grapheme
/// names ride along so downstream tools can address glyphs stably.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/post>
pub(crate) fn build(glyphs: &[GlyphRecord]) -> Vec<u8> {
    let mut w = ByteWriter::new();

    w.write_u32(0x0002_0000); // version 2.0
    w.write_u32(0); // italicAngle
    w.write_i16(0); // underlinePosition
    w.write_i16(0); // underlineThickness
    w.write_u32(0); // isFixedPitch
    w.write_u32(0); // minMemType42
    w.write_u32(0); // maxMemType42
    w.write_u32(0); // minMemType1
    w.write_u32(0); // maxMemType1

    w.write_u16(glyphs.len() as u16);

    let mut custom = Vec::new();
    for glyph in glyphs {
        if glyph.name == ".notdef" {
            w.write_u16(0);
        } else {
            w.write_u16(FIRST_CUSTOM_NAME + custom.len() as u16);
            custom.push(glyph.name.as_str());
        }
    }

    for name in custom {
        // Pascal string; names are short ASCII so the length always fits
        w.write_u8(name.len() as u8);
        w.write_bytes(name.as_bytes());
    }

    w.into_bytes()
}

#[cfg(test)]
mod test {
    use super::*;

    fn glyph(index: u16, name: &str) -> GlyphRecord {
        GlyphRecord {
            index,
            name: name.to_owned(),
            codepoints: Vec::new(),
            strike_image: None,
        }
    }

    #[test]
    fn notdef_uses_standard_index() {
        let glyphs = [glyph(0, ".notdef"), glyph(1, "emoji_1F600")];
        let data = build(&glyphs);

        assert_eq!(&data[32..34], &2u16.to_be_bytes()); // numGlyphs
        assert_eq!(&data[34..36], &0u16.to_be_bytes());
        assert_eq!(&data[36..38], &258u16.to_be_bytes());
    }

    #[test]
    fn custom_names_are_pascal_strings() {
        let glyphs = [glyph(0, ".notdef"), glyph(1, "emoji_1F600")];
        let data = build(&glyphs);

        let strings = &data[38..];
        assert_eq!(strings[0] as usize, "emoji_1F600".len());
        assert_eq!(&strings[1..], b"emoji_1F600");
    }
}
