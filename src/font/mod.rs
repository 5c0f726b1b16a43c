//! The icon font pipeline: coordinate normalization, toolchain invocation,
//! and glyph codepoint mapping.

mod glyphs;
mod normalize;
mod toolchain;

pub use glyphs::{GlyphAssignment, check_bijection, parse_glyph_table};
pub use normalize::{
    NormalizedPath, SinglePath, extract_single_path, normalize, normalize_path_data,
};
pub use toolchain::{CommandToolchain, FontToolchain, SvgFontParams};
