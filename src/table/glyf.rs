use crate::{outline::StubOutline, write::ByteWriter};

use super::TableTag;

const ON_CURVE: u8 = 1 << 0;

/// Glyph outline data plus the start offset of every glyph, from which the
/// `loca` table is derived.
#[derive(Debug)]
pub(crate) struct GlyfTable {
    pub data: Vec<u8>,
    /// `glyph_count + 1` entries; entry `i + 1` minus entry `i` is glyph
    /// `i`'s byte length
    pub offsets: Vec<u32>,
}

impl GlyfTable {
    pub const TAG: TableTag = TableTag::new(*b"glyf");

    /// Every glyph, the undefined glyph included, gets the same single
    /// closed rectangular contour
    pub fn build(glyph_count: u16, outline: &StubOutline) -> Self {
        let mut w = ByteWriter::new();
        let mut offsets = Vec::with_capacity(usize::from(glyph_count) + 1);

        for _ in 0..glyph_count {
            offsets.push(w.len() as u32);
            encode_stub_glyph(&mut w, outline);
            w.pad_to(4);
        }
        offsets.push(w.len() as u32);

        Self {
            data: w.into_bytes(),
            offsets,
        }
    }
}

/// Simple glyph with one contour and four on-curve points, coordinates
/// written as plain 16-bit deltas
fn encode_stub_glyph(w: &mut ByteWriter, outline: &StubOutline) {
    let points = outline.points();

    w.write_i16(1); // numberOfContours
    w.write_i16(outline.x_min);
    w.write_i16(outline.y_min);
    w.write_i16(outline.x_max);
    w.write_i16(outline.y_max);

    w.write_u16(points.len() as u16 - 1); // endPtsOfContours
    w.write_u16(0); // instructionLength

    for _ in &points {
        w.write_u8(ON_CURVE);
    }

    // x then y coordinates, each relative to the previous point
    let mut previous_x = 0;
    for &(x, _) in &points {
        w.write_i16(x - previous_x);
        previous_x = x;
    }
    let mut previous_y = 0;
    for &(_, y) in &points {
        w.write_i16(y - previous_y);
        previous_y = y;
    }
}
