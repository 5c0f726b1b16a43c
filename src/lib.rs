//! iconsmith: offline build step for SVG icon families.
//!
//! This crate turns a directory of standalone SVG icon files into two kinds
//! of consumable UI assets:
//!
//! - an inline SVG **iconset module** registering a `<defs>` sprite sheet for
//!   runtime `<use>` references, and
//! - an **icon font**: a WOFF embedded in a CSS `@font-face` block, with one
//!   CSS custom property per glyph and a JSON manifest of glyph names for
//!   visual regression tests.
//!
//! The interesting part is determinism. Source files are ordered by a
//! locale-independent comparator (so `eye` sorts before `eye-disabled` on
//! every platform), path coordinates are normalized from the authoring grid
//! into the font design grid with a single scale-then-round step, and the
//! name-to-codepoint mapping is read back from the generated font rather than
//! guessed. The external font-conversion binaries sit behind the
//! [`FontToolchain`] trait so the deterministic core never touches process
//! invocation.
//!
//! # Example
//!
//! ```no_run
//! use iconsmith::{FontBuild, IconsetBuild, CommandToolchain, SvgFontParams};
//!
//! // Sprite-sheet module for the `vaadin` family.
//! IconsetBuild::new("vaadin", "assets/svg", "vaadin-iconset.js")
//!     .with_size(16)
//!     .run()?;
//!
//! // Icon font + stylesheet + glyph manifest for the `lumo` family.
//! FontBuild::new(SvgFontParams::new("lumo-icons"), "icons/svg")
//!     .with_stylesheet_path("src/props/icons.css")
//!     .with_manifest_path("test/glyphs.json")
//!     .run(&CommandToolchain::default())?;
//! # Ok::<(), iconsmith::BuildError>(())
//! ```

mod build;
mod emit;
mod error;
mod font;
mod fragment;
mod source;

pub use build::{FontBuild, GridIconsetBuild, IconsetBuild};
pub use emit::{font_stylesheet, glyph_manifest, iconset_module};
pub use error::BuildError;
pub use font::{
    CommandToolchain, FontToolchain, GlyphAssignment, NormalizedPath, SinglePath, SvgFontParams,
    check_bijection, extract_single_path, normalize, normalize_path_data, parse_glyph_table,
};
pub use fragment::extract_fragment;
pub use source::{IconSource, collation_key, icon_name, normalize_name, read_icon_dir, stable_cmp};
