//! Inline SVG fragment extraction for the iconset pipeline.
//!
//! Each icon's full SVG document is reduced to the markup inside the root
//! `<svg>` element, wrapped in a `<g id="family:name">` so multiple icon
//! families can share one `<defs>` registry without id collisions.
//!
//! Two cleanups happen on the way through:
//!
//! - `fill` attributes on *direct* children of the root `<svg>` are dropped.
//!   Per-icon fill colors are a presentation concern that belongs to the
//!   consumer's CSS, not the sprite. Fills on nested elements are kept.
//! - Every element is serialized with an explicit open/close tag pair. Some
//!   inline-SVG consumers mishandle self-closing syntax, so `<path d="..."/>`
//!   becomes `<path d="..."></path>`.
//!
//! Both are tree operations on the parsed document, not text substitution,
//! so quoted attribute values can never be corrupted mid-rewrite. This
//! component does no file I/O.
//!
//! Prefixed namespaces survive extraction: qualified names such as
//! `xlink:href` keep their prefix, and each top-level element of the
//! fragment redeclares the prefixes its subtree uses, since the original
//! root `<svg>` carrying them is not part of the output. The default
//! namespace is intentionally dropped; the fragment inherits it from the
//! sprite sheet's own `<svg>`.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::BuildError;

/// Extracts the inline fragment for one icon.
///
/// `raw` is the full SVG document text; the returned string is
/// `<g id="<family>:<name>">…</g>` containing the root element's children.
/// `path` is only used to attribute parse errors to the offending file.
pub fn extract_fragment(
    family: &str,
    name: &str,
    raw: &str,
    path: &Path,
) -> Result<String, BuildError> {
    let doc = Document::parse(raw).map_err(|source| BuildError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut body = String::new();
    for child in doc.root_element().children() {
        if child.is_element() {
            write_element(child, true, true, &mut body);
        }
    }

    Ok(format!("<g id=\"{family}:{name}\">{body}</g>"))
}

/// Serializes one element subtree.
///
/// `strip_fill` applies only at this level; descendants keep their fills.
/// `top_level` elements redeclare the prefixed namespaces their subtree
/// uses.
fn write_element(node: Node<'_, '_>, strip_fill: bool, top_level: bool, out: &mut String) {
    let tag = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());
    out.push('<');
    out.push_str(&tag);

    if top_level {
        for (prefix, uri) in prefixed_namespaces(node) {
            out.push_str(" xmlns:");
            out.push_str(&prefix);
            out.push_str("=\"");
            escape_into(&uri, true, out);
            out.push('"');
        }
    }

    for attr in node.attributes() {
        if strip_fill && attr.name() == "fill" && attr.namespace().is_none() {
            continue;
        }
        out.push(' ');
        out.push_str(&qualified_name(node, attr.namespace(), attr.name()));
        out.push_str("=\"");
        escape_into(attr.value(), true, out);
        out.push('"');
    }
    out.push('>');

    for child in node.children() {
        if child.is_element() {
            write_element(child, false, false, out);
        } else if child.is_text() {
            escape_into(child.text().unwrap_or(""), false, out);
        }
    }

    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

/// Resolves a name to its prefixed form, e.g. `xlink:href`. Names in the
/// default namespace or in no namespace stay bare.
fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

/// Collects the prefixed namespaces used by tag or attribute names anywhere
/// in `root`'s subtree, first use first. The reserved `xml` prefix never
/// needs a declaration.
fn prefixed_namespaces(root: Node<'_, '_>) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = Vec::new();
    for node in root.descendants().filter(|n| n.is_element()) {
        let mut record = |namespace: Option<&str>| {
            let Some(uri) = namespace else { return };
            let Some(prefix) = node.lookup_prefix(uri) else { return };
            if prefix.is_empty() || prefix == "xml" {
                return;
            }
            if !found.iter().any(|(p, _)| p == prefix) {
                found.push((prefix.to_string(), uri.to_string()));
            }
        };
        record(node.tag_name().namespace());
        for attr in node.attributes() {
            record(attr.namespace());
        }
    }
    found
}

/// XML-escapes `value` into `out`. Quotes only need escaping inside
/// attribute values.
fn escape_into(value: &str, in_attr: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> String {
        extract_fragment("vaadin", "test", raw, Path::new("test.svg")).unwrap()
    }

    #[test]
    fn wraps_in_namespaced_group() {
        let out = extract(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#);
        assert!(out.starts_with("<g id=\"vaadin:test\">"));
        assert!(out.ends_with("</g>"));
    }

    #[test]
    fn strips_fill_on_direct_children() {
        let out = extract(r##"<svg><path fill="#000" d="M0 0"/></svg>"##);
        assert!(!out.contains("fill"));
        assert!(out.contains(r#"<path d="M0 0">"#));
    }

    #[test]
    fn keeps_fill_on_nested_elements() {
        let out = extract(r##"<svg><g fill="#000"><path fill="#fff" d="M0 0"/></g></svg>"##);
        // The <g> is a direct child, its fill goes; the nested path keeps its.
        assert!(out.contains("<g>"));
        assert!(out.contains(r##"fill="#fff""##));
    }

    #[test]
    fn self_closing_becomes_explicit_pair() {
        let out = extract(r#"<svg><path d="M0 0z"/></svg>"#);
        assert!(out.contains(r#"<path d="M0 0z"></path>"#));
        assert!(!out.contains("/>"));
    }

    #[test]
    fn multiple_children_keep_document_order() {
        let out = extract(r#"<svg><circle r="4"/><rect width="2"/></svg>"#);
        let circle = out.find("<circle").unwrap();
        let rect = out.find("<rect").unwrap();
        assert!(circle < rect);
    }

    #[test]
    fn keeps_namespace_prefixes_and_redeclares_them() {
        let out = extract(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/></svg>"##,
        );
        assert!(out.contains(r##"xlink:href="#a""##));
        assert!(out.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    }

    #[test]
    fn default_namespace_stays_unprefixed() {
        let out = extract(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#);
        assert!(out.contains(r#"<path d="M0 0"></path>"#));
        assert!(!out.contains("xmlns"));
    }

    #[test]
    fn escapes_attribute_values() {
        let out = extract(r#"<svg><text aria-label="a &amp; b &lt; c">x</text></svg>"#);
        assert!(out.contains(r#"aria-label="a &amp; b &lt; c""#));
        assert!(out.contains(">x</text>"));
    }

    #[test]
    fn invalid_xml_is_an_error() {
        let err = extract_fragment("v", "bad", "<svg><path", Path::new("bad.svg")).unwrap_err();
        assert!(matches!(err, BuildError::Xml { .. }));
    }
}
