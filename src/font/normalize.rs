//! Coordinate-space normalization for the font pipeline.
//!
//! Hand-authored icons live on a small grid (24 units by convention); the
//! generated font's design grid is much larger (1000 units per em). This
//! module rewrites a path's `d` string from one grid to the other: every
//! numeric token is multiplied by `em_size / source_grid` and rounded to the
//! nearest integer. Rounding happens once, after scaling, so error never
//! compounds across the commands of a path.
//!
//! It also owns the font pipeline's input contract: an icon source must be a
//! root `<svg>` with exactly one `<path d="...">` child. Anything else is a
//! fatal [`BuildError::MalformedInput`], because a skipped icon would
//! silently shift every following codepoint assignment.

use std::path::Path;

use roxmltree::Document;

use crate::error::BuildError;

// ============================================================================
// Single-Path Extraction
// ============================================================================

/// The path element extracted from a font-pipeline icon source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePath {
    /// Raw `d` attribute, still on the authoring grid.
    pub d: String,

    /// `fill-rule` attribute, carried through verbatim when present.
    pub fill_rule: Option<String>,

    /// `clip-rule` attribute, carried through verbatim when present.
    pub clip_rule: Option<String>,
}

/// Extracts the single `<path>` from an icon source document.
///
/// When `expected_grid` is given and the root `<svg>` carries a `viewBox`,
/// the viewBox extent must match it; an icon authored on a different grid
/// would otherwise scale into structurally valid but wrong geometry.
pub fn extract_single_path(
    raw: &str,
    source: &Path,
    expected_grid: Option<f64>,
) -> Result<SinglePath, BuildError> {
    let doc = Document::parse(raw).map_err(|e| BuildError::Xml {
        path: source.to_path_buf(),
        source: e,
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(BuildError::malformed(source, "root element is not <svg>"));
    }

    if let (Some(grid), Some(view_box)) = (expected_grid, root.attribute("viewBox")) {
        check_grid(view_box, grid).map_err(|reason| BuildError::malformed(source, reason))?;
    }

    let mut elements = root.children().filter(|n| n.is_element());
    let first = elements
        .next()
        .ok_or_else(|| BuildError::malformed(source, "no <path> element"))?;
    if elements.next().is_some() {
        return Err(BuildError::malformed(
            source,
            "more than one top-level element; multi-path icons are not supported",
        ));
    }
    if first.tag_name().name() != "path" {
        return Err(BuildError::malformed(
            source,
            format!("expected a <path> element, found <{}>", first.tag_name().name()),
        ));
    }

    let d = first
        .attribute("d")
        .ok_or_else(|| BuildError::malformed(source, "<path> has no d attribute"))?;

    Ok(SinglePath {
        d: d.to_string(),
        fill_rule: first.attribute("fill-rule").map(str::to_string),
        clip_rule: first.attribute("clip-rule").map(str::to_string),
    })
}

fn check_grid(view_box: &str, grid: f64) -> Result<(), String> {
    let parts: Vec<f64> = view_box
        .split([' ', ','])
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| format!("unparseable viewBox \"{view_box}\""))?;
    let &[_, _, w, h] = parts.as_slice() else {
        return Err(format!("unparseable viewBox \"{view_box}\""));
    };
    if w != grid || h != grid {
        return Err(format!(
            "authored on a {w}x{h} grid, expected {grid}x{grid}"
        ));
    }
    Ok(())
}

// ============================================================================
// Path Normalization
// ============================================================================

/// A path rewritten into the font design grid, integer coordinates only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    pub d: String,
    pub fill_rule: Option<String>,
    pub clip_rule: Option<String>,
}

impl NormalizedPath {
    /// Renders the path as an element with an explicit close tag.
    pub fn to_element(&self) -> String {
        let mut out = String::from("<path");
        if let Some(rule) = &self.fill_rule {
            out.push_str(&format!(" fill-rule=\"{rule}\""));
        }
        if let Some(rule) = &self.clip_rule {
            out.push_str(&format!(" clip-rule=\"{rule}\""));
        }
        out.push_str(&format!(" d=\"{}\"></path>", self.d));
        out
    }
}

/// Scales a [`SinglePath`] into the design grid.
///
/// `scale` is `em_size / source_grid`, applied uniformly to x and y.
pub fn normalize(path: &SinglePath, scale: f64) -> NormalizedPath {
    NormalizedPath {
        d: normalize_path_data(&path.d, scale),
        fill_rule: path.fill_rule.clone(),
        clip_rule: path.clip_rule.clone(),
    }
}

/// Rewrites every numeric token of a path `d` string as
/// `round(value * scale)`. Command letters and separators pass through
/// untouched.
pub fn normalize_path_data(d: &str, scale: f64) -> String {
    let bytes = d.as_bytes();
    let mut out = String::with_capacity(d.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if starts_number(bytes, i) {
            out.push_str(&d[copied..i]);
            let end = number_end(bytes, i);
            let token = &d[i..end];
            match token.parse::<f64>() {
                Ok(value) => {
                    let scaled = ((value * scale).round() as i64).to_string();
                    // Compact data can separate two tokens with nothing but
                    // the second one's leading dot (`1.5.5` is the pair
                    // 1.5, 0.5). Integers erase that boundary, so adjacent
                    // tokens need an explicit separator.
                    if copied == i
                        && out.ends_with(|c: char| c.is_ascii_digit())
                        && !scaled.starts_with('-')
                    {
                        out.push(' ');
                    }
                    out.push_str(&scaled);
                }
                // Scanner and f64 grammar should agree, but if they ever
                // disagree the token passes through unchanged.
                Err(_) => out.push_str(token),
            }
            i = end;
            copied = end;
        } else {
            i += 1;
        }
    }
    out.push_str(&d[copied..]);

    out
}

/// True if a numeric token starts at `i`: a digit, or a sign/dot leading
/// into digits. `e` never starts a token, so exponents are only consumed
/// inside [`number_end`] and path command letters are left alone.
fn starts_number(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'0'..=b'9' => true,
        b'+' | b'-' => matches!(bytes.get(i + 1), Some(b'0'..=b'9') | Some(b'.')),
        b'.' => matches!(bytes.get(i + 1), Some(b'0'..=b'9')),
        _ => false,
    }
}

/// Scans past one numeric token: `[sign] digits [. digits] [e [sign] digits]`.
fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    if matches!(bytes[i], b'+' | b'-') {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    // Exponent only counts if digits actually follow.
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = j;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    i
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: f64 = 1000.0 / 24.0;

    #[test]
    fn square_scales_to_em_grid() {
        let d = normalize_path_data("M0,0 L24,0 L24,24 L0,24 Z", SCALE);
        assert_eq!(d, "M0,0 L1000,0 L1000,1000 L0,1000 Z");
    }

    #[test]
    fn rounds_after_scaling() {
        // 7 * 1000/24 = 291.66.. -> 292; interleaved rounding would give 291.
        let d = normalize_path_data("M7 7", SCALE);
        assert_eq!(d, "M292 292");
    }

    #[test]
    fn handles_negative_and_fractional_coordinates() {
        let d = normalize_path_data("m-1.5.5l2-2", 2.0);
        assert_eq!(d, "m-3 1l4-4");
    }

    #[test]
    fn adjacent_tokens_stay_separated() {
        // `M1.5.5` is the point (1.5, 0.5); once both coordinates become
        // integers the dot no longer separates them.
        assert_eq!(normalize_path_data("M1.5.5", 2.0), "M3 1");
        // A leading minus already separates, no space needed.
        assert_eq!(normalize_path_data("M1.5-.5", 2.0), "M3-1");
    }

    #[test]
    fn handles_exponent_notation() {
        let d = normalize_path_data("M1e1 2E-1", 10.0);
        assert_eq!(d, "M100 2");
    }

    #[test]
    fn extracts_path_with_rule_pair() {
        let raw = r#"<svg viewBox="0 0 24 24"><path fill-rule="evenodd" clip-rule="evenodd" d="M0 0h24v24H0z"/></svg>"#;
        let path = extract_single_path(raw, Path::new("a.svg"), Some(24.0)).unwrap();
        assert_eq!(path.d, "M0 0h24v24H0z");
        assert_eq!(path.fill_rule.as_deref(), Some("evenodd"));
        assert_eq!(path.clip_rule.as_deref(), Some("evenodd"));
    }

    #[test]
    fn rejects_missing_path() {
        let err = extract_single_path("<svg/>", Path::new("bad.svg"), None).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_multiple_top_level_elements() {
        let raw = r#"<svg><path d="M0 0"/><path d="M1 1"/></svg>"#;
        let err = extract_single_path(raw, Path::new("multi.svg"), None).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_path_without_d() {
        let err = extract_single_path("<svg><path/></svg>", Path::new("nod.svg"), None).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_mismatched_grid() {
        let raw = r#"<svg viewBox="0 0 16 16"><path d="M0 0"/></svg>"#;
        let err = extract_single_path(raw, Path::new("grid.svg"), Some(24.0)).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));
    }

    #[test]
    fn rejects_unparseable_viewbox() {
        // A non-numeric token must fail validation, not be skipped.
        let raw = r#"<svg viewBox="x y 24 24"><path d="M0 0"/></svg>"#;
        let err = extract_single_path(raw, Path::new("vb.svg"), Some(24.0)).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));

        // So must a viewBox with the wrong number of fields.
        let raw = r#"<svg viewBox="0 0 24"><path d="M0 0"/></svg>"#;
        let err = extract_single_path(raw, Path::new("vb.svg"), Some(24.0)).unwrap_err();
        assert!(matches!(err, BuildError::MalformedInput { .. }));
    }

    #[test]
    fn viewbox_not_required() {
        let raw = r#"<svg><path d="M0 0"/></svg>"#;
        assert!(extract_single_path(raw, Path::new("ok.svg"), Some(24.0)).is_ok());
    }

    #[test]
    fn normalized_element_reattaches_rules() {
        let path = SinglePath {
            d: "M0 0 L24 24".into(),
            fill_rule: Some("evenodd".into()),
            clip_rule: None,
        };
        let element = normalize(&path, SCALE).to_element();
        assert_eq!(element, r#"<path fill-rule="evenodd" d="M0 0 L1000 1000"></path>"#);
    }
}
