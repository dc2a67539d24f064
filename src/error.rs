use std::{error, fmt};

#[derive(Debug)]
pub enum FontError {
    /// The same grapheme was supplied twice. Callers are expected to
    /// de-duplicate captures before building, so this indicates a caller
    /// bug rather than bad user input.
    DuplicateGrapheme {
        grapheme: String,
    },

    /// No capture survived raster decoding, so there is nothing to encode.
    EmptyGlyphSet,

    /// A capture's stored bytes are not a valid raster. Never aborts a
    /// build on its own; the capture is skipped and the build continues
    /// with the remaining glyphs.
    RasterDecode {
        grapheme: String,
        reason: String,
    },

    /// A table-construction sub-step failed. A partial table set is
    /// unusable, so this aborts the whole build.
    Assembly {
        step: &'static str,
        reason: String,
    },
}

pub type FontResult<T> = Result<T, FontError>;

impl FontError {
    pub(crate) fn assembly(step: &'static str, reason: impl Into<String>) -> Self {
        Self::Assembly {
            step,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateGrapheme { grapheme } => {
                write!(f, "duplicate grapheme in capture set: {:?}", grapheme)
            }
            Self::EmptyGlyphSet => write!(f, "no captures with usable images"),
            Self::RasterDecode { grapheme, reason } => {
                write!(f, "invalid raster for {:?}: {}", grapheme, reason)
            }
            Self::Assembly { step, reason } => {
                write!(f, "font assembly failed at {}: {}", step, reason)
            }
        }
    }
}

impl error::Error for FontError {}
