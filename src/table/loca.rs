use crate::write::ByteWriter;

use super::{GlyfTable, TableTag};

/// Index to glyph locations, long (32-bit) format to match the header's
/// `indexToLocFormat` of 1.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/loca>
#[derive(Debug, Clone)]
pub(crate) struct LocaTable {
    pub offsets: Vec<u32>,
}

impl LocaTable {
    pub const TAG: TableTag = TableTag::new(*b"loca");

    pub fn from_glyf(glyf: &GlyfTable) -> Self {
        Self {
            offsets: glyf.offsets.clone(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();

        for &offset in &self.offsets {
            w.write_u32(offset);
        }

        w.into_bytes()
    }
}
