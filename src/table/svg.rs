use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{metrics::StrikeMetrics, write::ByteWriter};

use super::{cbdt::GlyphBitmap, TableTag};

pub(crate) const TAG: TableTag = TableTag::new(*b"SVG ");

/// An inline vector document covering one glyph index range. This builder
/// always emits one document per glyph, so `start == end` throughout.
#[derive(Debug)]
pub(crate) struct SvgDocument {
    pub start_glyph: u16,
    pub end_glyph: u16,
    pub document: String,
}

impl SvgDocument {
    /// Wrap a strike PNG in an SVG document. Consumers locate the glyph by
    /// the `glyph<N>` id attribute, and the image sits on the baseline by
    /// being shifted up a full ascent.
    fn wrap_bitmap(bitmap: &GlyphBitmap, metrics: &StrikeMetrics) -> Self {
        let document = format!(
            "<svg version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n\
             <g id=\"glyph{id}\">\n\
             <image x=\"0\" y=\"{y}\" width=\"{size}\" height=\"{size}\" \
             xlink:href=\"data:image/png;base64,{data}\"/>\n\
             </g>\n\
             </svg>",
            id = bitmap.glyph_index,
            y = -metrics.ascent,
            size = metrics.units_per_em,
            data = STANDARD.encode(&bitmap.png),
        );

        Self {
            start_glyph: bitmap.glyph_index,
            end_glyph: bitmap.glyph_index,
            document,
        }
    }
}

/// Vector fallback table for renderers without color-bitmap support.
///
/// Returns `None` (after logging) when there is nothing to wrap; the
/// bitmap tables alone are sufficient for many renderers, so this is not a
/// hard failure.
///
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/svg>
pub(crate) fn build(bitmaps: &[GlyphBitmap], metrics: &StrikeMetrics) -> Option<Vec<u8>> {
    if bitmaps.is_empty() {
        log::warn!("no glyphs with images, omitting vector fallback table");
        return None;
    }

    let mut documents = bitmaps
        .iter()
        .map(|bitmap| SvgDocument::wrap_bitmap(bitmap, metrics))
        .collect::<Vec<_>>();

    // consumers binary-search the document list by glyph range; an
    // unsorted list fails lookups silently rather than loudly
    documents.sort_by_key(|doc| doc.start_glyph);

    let mut w = ByteWriter::new();

    w.write_u16(0); // version
    w.write_u32(10); // offset to the document list
    w.write_u32(0); // reserved

    // document list: count, index entries, then the documents themselves
    let entries_len = 2 + 12 * documents.len() as u32;

    w.write_u16(documents.len() as u16);

    let mut document_offset = entries_len;
    for doc in &documents {
        w.write_u16(doc.start_glyph);
        w.write_u16(doc.end_glyph);
        w.write_u32(document_offset);
        w.write_u32(doc.document.len() as u32);
        document_offset += doc.document.len() as u32;
    }

    for doc in &documents {
        w.write_bytes(doc.document.as_bytes());
    }

    Some(w.into_bytes())
}
