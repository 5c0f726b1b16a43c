//! Glyph table parsing and codepoint mapping.
//!
//! After the toolchain produces the SVG font, its `<glyph>` elements are the
//! authoritative record of which codepoint each icon landed on. This module
//! reads that table back and projects it into the two downstream shapes: CSS
//! custom-property declarations and the glyph-name manifest used by visual
//! regression tests.
//!
//! Iteration order everywhere follows the font's glyph emission order. The
//! toolchain contract keeps that equal to the order the sources were passed
//! in, which the build fixed with the stable collation; this module does not
//! (and cannot) re-sort.

use std::path::Path;

use roxmltree::Document;

use crate::error::BuildError;
use crate::source::normalize_name;

/// One glyph's name-to-codepoint assignment.
///
/// `codepoint` is the first UTF-16 code unit of the unicode string the
/// toolchain reported for the glyph; each glyph is invoked with exactly one
/// codepoint, so the first unit identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphAssignment {
    /// Glyph name exactly as the toolchain reported it. The manifest carries
    /// this verbatim; CSS sees the normalized form via [`Self::css_name`].
    pub name: String,

    /// Assigned codepoint as a UTF-16 code unit.
    pub codepoint: u16,
}

impl GlyphAssignment {
    /// The name normalized like icon names (lowercase, whitespace to
    /// hyphens), the form that matches the source file and is safe in a CSS
    /// identifier.
    pub fn css_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// The codepoint as a lowercase hex escape for CSS `content` and
    /// custom-property values, e.g. `\e900`.
    pub fn css_escape(&self) -> String {
        format!("\\{:x}", self.codepoint)
    }

    /// One CSS custom-property declaration, e.g.
    /// `--lumo-icons-eye: '\e905';`.
    pub fn css_declaration(&self, prefix: &str) -> String {
        format!("--{}-icons-{}: '{}';", prefix, self.css_name(), self.css_escape())
    }
}

/// Parses the glyph table of an SVG font.
///
/// Takes the `<glyph>` children of the first `<font>` element in document
/// order; each must carry a `glyph-name` and a non-empty `unicode`
/// attribute, otherwise the font is not one this pipeline produced and the
/// error surfaces as a toolchain failure.
pub fn parse_glyph_table(svg_font: &str, origin: &Path) -> Result<Vec<GlyphAssignment>, BuildError> {
    let doc = Document::parse(svg_font).map_err(|e| BuildError::Xml {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let font = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "font")
        .ok_or_else(|| {
            BuildError::toolchain("svg font", format!("no <font> element in {}", origin.display()))
        })?;

    let mut glyphs = Vec::new();
    for node in font.children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "glyph" {
            continue;
        }
        let name = node.attribute("glyph-name").ok_or_else(|| {
            BuildError::toolchain("svg font", "glyph without glyph-name attribute")
        })?;
        let unicode = node.attribute("unicode").ok_or_else(|| {
            BuildError::toolchain("svg font", format!("glyph {name} without unicode attribute"))
        })?;
        let codepoint = unicode.encode_utf16().next().ok_or_else(|| {
            BuildError::toolchain("svg font", format!("glyph {name} has an empty unicode value"))
        })?;
        glyphs.push(GlyphAssignment {
            name: name.to_string(),
            codepoint,
        });
    }

    Ok(glyphs)
}

/// Checks the name bijection between sources and glyphs: same count, every
/// glyph name unique. A mismatch means the toolchain dropped or invented a
/// glyph and the codepoint contract is broken.
///
/// Glyph names are normalized before comparison; source names are already
/// normalized by the directory scan.
pub fn check_bijection(
    glyphs: &[GlyphAssignment],
    source_names: &[String],
) -> Result<(), BuildError> {
    if glyphs.len() != source_names.len() {
        return Err(BuildError::toolchain(
            "svg font",
            format!(
                "glyph table has {} entries for {} icon sources",
                glyphs.len(),
                source_names.len()
            ),
        ));
    }
    let mut seen: Vec<String> = Vec::with_capacity(glyphs.len());
    for glyph in glyphs {
        let name = glyph.css_name();
        if seen.contains(&name) {
            return Err(BuildError::toolchain(
                "svg font",
                format!("duplicate glyph name {}", glyph.name),
            ));
        }
        if !source_names.contains(&name) {
            return Err(BuildError::toolchain(
                "svg font",
                format!("glyph {} has no matching icon source", glyph.name),
            ));
        }
        seen.push(name);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
