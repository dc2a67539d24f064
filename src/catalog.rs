use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{FontError, FontResult},
    metrics::StrikeMetrics,
    raster::Raster,
};

/// Variation selectors force text or emoji presentation of the preceding
/// character and must never resolve to a glyph on their own
const VARIATION_SELECTORS: [u32; 2] = [0xFE0E, 0xFE0F];

/// One symbol supplied by the caller: a grapheme and the stored PNG bytes
/// of its cropped capture.
///
/// Identity is the grapheme string; the capture set holds at most one
/// capture per grapheme.
#[derive(Debug, Clone)]
pub struct SymbolCapture {
    pub grapheme: String,
    pub image: Vec<u8>,
}

impl SymbolCapture {
    pub fn new(grapheme: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            grapheme: grapheme.into(),
            image,
        }
    }
}

/// The font-internal renderable unit
#[derive(Debug, Clone)]
pub struct GlyphRecord {
    /// Position in glyph order. 0 is reserved for the undefined glyph
    pub index: u16,

    pub name: String,

    /// Scalar values mapped to this glyph, excluding variation selectors
    pub codepoints: Vec<u32>,

    /// Capture resampled to exactly the strike resolution. `None` only for
    /// the undefined glyph
    pub strike_image: Option<Raster>,
}

/// Ordered, de-duplicated glyph list plus the codepoint -> glyph index map.
///
/// Real glyph indices form a contiguous ascending run starting at 1, and
/// every real glyph carries a strike image; captures whose bytes fail to
/// decode are dropped before indices are assigned so the bitmap tables can
/// declare a gap-free `[first, last]` glyph range.
#[derive(Debug)]
pub struct GlyphCatalog {
    glyphs: Vec<GlyphRecord>,
    codepoint_map: BTreeMap<u32, u16>,
}

impl GlyphCatalog {
    pub fn build(captures: &[SymbolCapture], metrics: &StrikeMetrics) -> FontResult<Self> {
        let mut seen = BTreeSet::new();
        for capture in captures {
            if !seen.insert(capture.grapheme.as_str()) {
                return Err(FontError::DuplicateGrapheme {
                    grapheme: capture.grapheme.clone(),
                });
            }
        }

        // Decode everything up front, collecting a per-capture outcome.
        // Failures skip only that capture.
        let mut survivors = Vec::new();
        for capture in captures {
            match Raster::decode_png(&capture.image) {
                Ok(raster) => survivors.push((capture, raster)),
                Err(err) => {
                    let err = FontError::RasterDecode {
                        grapheme: capture.grapheme.clone(),
                        reason: err.to_string(),
                    };
                    log::warn!("skipping capture: {}", err);
                }
            }
        }

        if survivors.is_empty() {
            return Err(FontError::EmptyGlyphSet);
        }

        if survivors.len() + 1 > usize::from(u16::MAX) {
            return Err(FontError::assembly(
                "glyph catalog",
                format!("{} captures exceed the glyph index space", survivors.len()),
            ));
        }

        let ppem = u32::from(metrics.pixels_per_em);

        let mut glyphs = vec![GlyphRecord {
            index: 0,
            name: String::from(".notdef"),
            codepoints: Vec::new(),
            strike_image: None,
        }];
        let mut codepoint_map = BTreeMap::new();

        for (position, (capture, raster)) in survivors.into_iter().enumerate() {
            let index = (position + 1) as u16;

            let mut codepoints = Vec::new();
            for c in capture.grapheme.chars() {
                let code = c as u32;
                if VARIATION_SELECTORS.contains(&code) {
                    continue;
                }
                // First capture claiming a codepoint keeps it, so no two
                // glyphs ever share one
                if let std::collections::btree_map::Entry::Vacant(entry) =
                    codepoint_map.entry(code)
                {
                    entry.insert(index);
                    codepoints.push(code);
                }
            }

            glyphs.push(GlyphRecord {
                index,
                name: glyph_name(&capture.grapheme),
                codepoints,
                strike_image: Some(raster.resample(ppem, ppem)),
            });
        }

        Ok(Self {
            glyphs,
            codepoint_map,
        })
    }

    /// All glyphs in index order, the undefined glyph first
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    /// Glyphs with indices >= 1, i.e. everything but the undefined glyph
    pub fn real_glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs[1..]
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyphs.len() as u16
    }

    pub fn codepoint_map(&self) -> &BTreeMap<u32, u16> {
        &self.codepoint_map
    }
}

/// Deterministic glyph name from the grapheme's scalar values.
///
/// Renderers and inspection tools cache by glyph name, so the derivation
/// must be stable for a given grapheme across builds.
pub(crate) fn glyph_name(grapheme: &str) -> String {
    let codepoints = grapheme
        .chars()
        .map(|c| format!("{:04X}", c as u32))
        .collect::<Vec<_>>();

    format!("emoji_{}", codepoints.join("_"))
}

#[cfg(test)]
mod test {
    use super::*;

    fn capture(grapheme: &str) -> SymbolCapture {
        let image = Raster::solid(127, 127, [255, 200, 0, 255])
            .encode_png()
            .unwrap();
        SymbolCapture::new(grapheme, image)
    }

    #[test]
    fn names_are_stable_and_unique() {
        assert_eq!(glyph_name("\u{1F600}"), "emoji_1F600");
        assert_eq!(glyph_name("\u{263A}\u{FE0F}"), "emoji_263A_FE0F");
        assert_eq!(glyph_name("a"), "emoji_0061");
    }

    #[test]
    fn indices_are_contiguous_from_one() {
        let captures = [capture("\u{1F600}"), capture("\u{1F601}"), capture("\u{1F602}")];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();

        assert_eq!(catalog.glyph_count(), 4);
        assert_eq!(catalog.glyphs()[0].name, ".notdef");
        for (i, glyph) in catalog.real_glyphs().iter().enumerate() {
            assert_eq!(glyph.index, i as u16 + 1);
            assert!(glyph.strike_image.is_some());
        }
    }

    #[test]
    fn variation_selectors_are_not_mapped() {
        let captures = [capture("\u{263A}\u{FE0F}")];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();

        assert_eq!(catalog.codepoint_map().get(&0x263A), Some(&1));
        assert!(!catalog.codepoint_map().contains_key(&0xFE0F));
        assert!(!catalog.codepoint_map().contains_key(&0xFE0E));
    }

    #[test]
    fn duplicate_grapheme_is_rejected() {
        let captures = [capture("\u{1F600}"), capture("\u{1F600}")];
        let err = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap_err();

        assert!(matches!(err, FontError::DuplicateGrapheme { .. }));
    }

    #[test]
    fn undecodable_capture_is_skipped() {
        let captures = [
            capture("\u{1F600}"),
            SymbolCapture::new("\u{1F601}", b"not a png".to_vec()),
            capture("\u{1F602}"),
        ];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();

        // the bad capture is gone and the survivors stay contiguous
        assert_eq!(catalog.glyph_count(), 3);
        assert_eq!(catalog.real_glyphs()[0].name, "emoji_1F600");
        assert_eq!(catalog.real_glyphs()[1].name, "emoji_1F602");
        assert_eq!(catalog.real_glyphs()[1].index, 2);
    }

    #[test]
    fn all_captures_unusable_is_empty_glyph_set() {
        let captures = [SymbolCapture::new("\u{1F600}", vec![1, 2, 3])];
        let err = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap_err();

        assert!(matches!(err, FontError::EmptyGlyphSet));
    }

    #[test]
    fn strike_images_are_resampled_to_strike_resolution() {
        let image = Raster::solid(512, 512, [0, 0, 255, 255])
            .encode_png()
            .unwrap();
        let captures = [SymbolCapture::new("\u{1F600}", image)];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();

        let strike = catalog.real_glyphs()[0].strike_image.as_ref().unwrap();
        assert_eq!((strike.width(), strike.height()), (127, 127));
    }

    #[test]
    fn shared_codepoint_goes_to_first_capture() {
        // same base scalar with and without the emoji presentation selector
        let captures = [capture("\u{263A}"), capture("\u{263A}\u{FE0F}")];
        let catalog = GlyphCatalog::build(&captures, &StrikeMetrics::default()).unwrap();

        assert_eq!(catalog.codepoint_map().get(&0x263A), Some(&1));
        assert!(catalog.real_glyphs()[1].codepoints.is_empty());
    }
}
