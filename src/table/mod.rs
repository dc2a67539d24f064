pub(crate) mod cbdt;
pub(crate) mod cblc;
pub(crate) mod cmap;
mod font_directory;
mod glyf;
mod head;
mod hhea;
pub(crate) mod hmtx;
mod loca;
mod maxp;
pub(crate) mod name;
pub(crate) mod os2;
pub(crate) mod post;
pub(crate) mod svg;
mod tag;

pub(crate) use cbdt::{CbdtTable, GlyphBitmap};
pub(crate) use font_directory::{DirectoryTableEntry, OffsetSubtable};
pub(crate) use glyf::GlyfTable;
pub(crate) use head::Head;
pub(crate) use hhea::Hhea;
pub(crate) use loca::LocaTable;
pub(crate) use maxp::Maxp;
pub use tag::TableTag;
