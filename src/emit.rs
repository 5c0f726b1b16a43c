//! Output artifact rendering.
//!
//! Pure templating: each emitter is a function from already-computed build
//! data to the final file text. No business logic lives here and nothing
//! touches the filesystem; the orchestrators in [`crate::build`] decide where
//! the text goes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::BuildError;
use crate::font::GlyphAssignment;

/// Renders the iconset registration module.
///
/// The module creates an HTML `<template>`, fills it with a
/// `<svg><defs>…</defs></svg>` sprite sheet of the given fragments, and
/// registers it with the iconset registry under `family` at the nominal
/// `size`.
pub fn iconset_module(
    header: &str,
    registry_import: &str,
    family: &str,
    size: u32,
    fragments: &[String],
) -> String {
    format!(
        "{header}\nimport {{ Iconset }} from '{registry_import}';\n\n\
         const template = document.createElement('template');\n\n\
         template.innerHTML = `<svg><defs>\n{fragments}\n</defs></svg>`;\n\n\
         Iconset.register('{family}', {size}, template);\n",
        fragments = fragments.join("\n"),
    )
}

/// Renders the icon font stylesheet: a `@font-face` rule with the WOFF
/// embedded as a base64 data URI, followed by one custom property per glyph
/// scoped to `:root`/`:host`.
pub fn font_stylesheet(
    header: &str,
    font_name: &str,
    css_prefix: &str,
    woff: &[u8],
    glyphs: &[GlyphAssignment],
) -> String {
    let declarations: Vec<String> = glyphs
        .iter()
        .map(|g| g.css_declaration(css_prefix))
        .collect();

    format!(
        "{header}\n@font-face {{\n  font-family: '{font_name}';\n  \
         src: url(data:application/font-woff;charset=utf-8;base64,{woff})\n    \
         format('woff');\n  font-weight: normal;\n  font-style: normal;\n}}\n\n\
         :where(:root),\n:where(:host) {{\n  {declarations}\n}}\n",
        woff = BASE64.encode(woff),
        declarations = declarations.join("\n  "),
    )
}

/// Renders the glyph-name manifest consumed by visual-test tooling: a JSON
/// array of raw glyph names in glyph-table order. JSON cannot carry a
/// comment block, so this is the one artifact without a license header.
pub fn glyph_manifest(glyphs: &[GlyphAssignment]) -> Result<String, BuildError> {
    let names: Vec<&str> = glyphs.iter().map(|g| g.name.as_str()).collect();
    Ok(serde_json::to_string_pretty(&names)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "/* (c) example */";

    fn sample_glyphs() -> Vec<GlyphAssignment> {
        vec![
            GlyphAssignment { name: "arrow".into(), codepoint: 0xe900 },
            GlyphAssignment { name: "eye".into(), codepoint: 0xe901 },
            GlyphAssignment { name: "eye-disabled".into(), codepoint: 0xe902 },
        ]
    }

    #[test]
    fn iconset_module_layout() {
        let fragments = vec!["<g id=\"v:a\"></g>".to_string(), "<g id=\"v:b\"></g>".to_string()];
        let out = iconset_module(HEADER, "@vaadin/icon/vaadin-iconset.js", "vaadin", 16, &fragments);

        assert!(out.starts_with(HEADER));
        assert!(out.contains("import { Iconset } from '@vaadin/icon/vaadin-iconset.js';"));
        assert!(out.contains("template.innerHTML = `<svg><defs>\n<g id=\"v:a\"></g>\n<g id=\"v:b\"></g>\n</defs></svg>`;"));
        assert!(out.contains("Iconset.register('vaadin', 16, template);"));
    }

    #[test]
    fn stylesheet_embeds_woff_and_declarations() {
        let out = font_stylesheet(HEADER, "lumo-icons", "lumo", b"WOFF", &sample_glyphs());

        assert!(out.starts_with(HEADER));
        assert!(out.contains("font-family: 'lumo-icons';"));
        assert!(out.contains(&format!(
            "url(data:application/font-woff;charset=utf-8;base64,{})",
            BASE64.encode(b"WOFF")
        )));
        assert!(out.contains(":where(:root),\n:where(:host) {"));
        assert!(out.contains("--lumo-icons-eye: '\\e901';"));
    }

    #[test]
    fn stylesheet_has_one_declaration_per_glyph() {
        let glyphs = sample_glyphs();
        let out = font_stylesheet(HEADER, "f", "lumo", &[], &glyphs);
        assert_eq!(out.matches("--lumo-icons-").count(), glyphs.len());
        // `eye` must not double-count as a prefix of `eye-disabled`.
        assert_eq!(out.matches("--lumo-icons-eye: ").count(), 1);
    }

    #[test]
    fn manifest_lists_names_in_glyph_order() {
        let manifest = glyph_manifest(&sample_glyphs()).unwrap();
        let names: Vec<String> = serde_json::from_str(&manifest).unwrap();
        assert_eq!(names, ["arrow", "eye", "eye-disabled"]);
    }

    #[test]
    fn manifest_keeps_raw_toolchain_names() {
        let glyphs = vec![GlyphAssignment { name: "Eye Disabled".into(), codepoint: 0xe900 }];
        let manifest = glyph_manifest(&glyphs).unwrap();
        let names: Vec<String> = serde_json::from_str(&manifest).unwrap();
        assert_eq!(names, ["Eye Disabled"]);
    }
}
