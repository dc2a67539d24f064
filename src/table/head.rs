use crate::{metrics::StrikeMetrics, outline::StubOutline, write::ByteWriter};

use super::TableTag;

/// Global font header.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/head>
#[derive(Debug)]
pub(crate) struct Head {
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Head {
    pub const TAG: TableTag = TableTag::new(*b"head");

    pub const MAGIC: u32 = 0x5F0F3CF5;

    /// Byte offset of `checkSumAdjustment` within this table. The assembler
    /// patches the field after the whole-font checksum is known.
    pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

    /// baseline at y=0, left sidebearing at x=0
    const FLAGS: u16 = 0b0000_0011;

    pub fn new(metrics: &StrikeMetrics) -> Self {
        let bbox = StubOutline::new(metrics);

        Self {
            units_per_em: metrics.units_per_em,
            x_min: bbox.x_min,
            y_min: bbox.y_min,
            x_max: bbox.x_max,
            y_max: bbox.y_max,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();

        w.write_u32(0x0001_0000); // version 1.0
        w.write_u32(0x0001_0000); // fontRevision
        w.write_u32(0); // checkSumAdjustment, patched later
        w.write_u32(Self::MAGIC);
        w.write_u16(Self::FLAGS);
        w.write_u16(self.units_per_em);
        // zeroed created/modified keep builds byte-for-byte reproducible
        w.write_i64(0);
        w.write_i64(0);
        w.write_i16(self.x_min);
        w.write_i16(self.y_min);
        w.write_i16(self.x_max);
        w.write_i16(self.y_max);
        w.write_u16(0); // macStyle
        w.write_u16(8); // lowestRecPPEM
        w.write_i16(2); // fontDirectionHint
        w.write_i16(1); // indexToLocFormat: long loca offsets
        w.write_i16(0); // glyphDataFormat

        w.into_bytes()
    }
}
