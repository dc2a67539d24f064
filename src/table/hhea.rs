use crate::{metrics::StrikeMetrics, write::ByteWriter};

use super::TableTag;

/// Horizontal header.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/hhea>
#[derive(Debug)]
pub(crate) struct Hhea {
    pub ascender: i16,
    pub descender: i16,
    pub advance_width_max: u16,
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub const TAG: TableTag = TableTag::new(*b"hhea");

    pub fn new(metrics: &StrikeMetrics, number_of_h_metrics: u16) -> Self {
        Self {
            ascender: metrics.ascent,
            descender: metrics.descent,
            advance_width_max: metrics.units_per_em,
            number_of_h_metrics,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();

        w.write_u32(0x0001_0000); // version 1.0
        w.write_i16(self.ascender);
        w.write_i16(self.descender);
        w.write_i16(0); // lineGap
        w.write_u16(self.advance_width_max);
        w.write_i16(0); // minLeftSideBearing
        w.write_i16(0); // minRightSideBearing
        w.write_i16(self.advance_width_max as i16); // xMaxExtent
        w.write_i16(1); // caretSlopeRise
        w.write_i16(0); // caretSlopeRun
        w.write_i16(0); // caretOffset
        for _ in 0..4 {
            w.write_i16(0); // reserved
        }
        w.write_i16(0); // metricDataFormat
        w.write_u16(self.number_of_h_metrics);

        w.into_bytes()
    }
}
