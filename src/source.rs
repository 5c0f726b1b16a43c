//! Icon source loading and stable file ordering.
//!
//! Both pipelines start from a directory of `*.svg` files. The order in which
//! those files are processed is load-bearing: in the font pipeline it fixes
//! the glyph-to-codepoint assignment, and in the iconset pipeline it fixes the
//! output layout that visual regression diffs run against. Host filesystems
//! and locale collations do not agree on where `-` sorts relative to letters,
//! so this module defines its own comparator instead of relying on whatever
//! the OS directory listing or the ambient locale happens to produce.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

// ============================================================================
// IconSource
// ============================================================================

/// One SVG icon file, read once per build run and immutable thereafter.
#[derive(Debug, Clone)]
pub struct IconSource {
    /// Icon name derived from the filename: the `.svg` stem, lowercased,
    /// with internal whitespace replaced by hyphens.
    pub name: String,

    /// Path the source was read from, kept for error reporting and for
    /// passing through to the external font toolchain.
    pub path: PathBuf,

    /// Raw UTF-8 file content.
    pub raw: String,
}

impl IconSource {
    /// Reads a single icon source from disk.
    pub fn read(path: &Path) -> Result<Self, BuildError> {
        let raw = fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            name: icon_name(path),
            path: path.to_path_buf(),
            raw,
        })
    }
}

/// Derives the icon name from a source path.
///
/// `Eye Disabled.svg` becomes `eye-disabled`; the same normalization is
/// applied to glyph names read back from the generated font so the two sides
/// agree.
pub fn icon_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    normalize_name(&stem)
}

/// Lowercases a name and replaces every whitespace character with a hyphen.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

// ============================================================================
// Stable Ordering
// ============================================================================

/// Builds the collation key for a filename: every `-` replaced with `~`.
///
/// `~` (0x7E) sorts after all ASCII alphanumerics, so for names where one is
/// a prefix of the other followed by a hyphenated suffix (`eye` vs
/// `eye-disabled`), the shorter name always comes first. Comparing keys by
/// Unicode code point is identical on every host OS and locale.
pub fn collation_key(name: &str) -> String {
    name.replace('-', "~")
}

/// Compares two icon names under the stable collation.
///
/// Total order with no ties for distinct filenames; a pure function over
/// already-listed names (an empty input set is an empty, valid order).
pub fn stable_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Reads every `*.svg` file in `dir` and returns the sources sorted by the
/// stable collation over their filenames.
pub fn read_icon_dir(dir: &Path) -> Result<Vec<IconSource>, BuildError> {
    let entries = fs::read_dir(dir).map_err(|source| BuildError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "svg") {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| {
        let a = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        stable_cmp(&a, &b)
    });

    paths.iter().map(|p| IconSource::read(p)).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn name_from_path_lowercases_and_hyphenates() {
        assert_eq!(icon_name(Path::new("/x/Eye Disabled.svg")), "eye-disabled");
        assert_eq!(icon_name(Path::new("arrow-up.svg")), "arrow-up");
    }

    #[test]
    fn prefix_sorts_before_hyphen_continuation() {
        // Byte order would put `eye-disabled.svg` ('-' = 0x2d) before
        // `eye.svg` ('.' = 0x2e); the collation key flips that.
        assert_eq!(stable_cmp("eye.svg", "eye-disabled.svg"), Ordering::Less);
        assert_eq!(stable_cmp("eye", "eye-disabled"), Ordering::Less);
    }

    #[test]
    fn stable_order_is_total() {
        // The tilde key pushes hyphenated continuations after plain words,
        // so `eyedropper` precedes every `eye-*` name.
        let mut names = vec!["eye-slash", "eyedropper", "eye", "eye-disabled"];
        names.sort_by(|a, b| stable_cmp(a, b));
        assert_eq!(names, ["eye", "eyedropper", "eye-disabled", "eye-slash"]);
    }

    #[test]
    fn read_dir_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["eye-disabled.svg", "eye.svg", "notes.txt", "arrow.svg"] {
            fs::write(dir.path().join(name), "<svg/>").unwrap();
        }

        let sources = read_icon_dir(dir.path()).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["arrow", "eye", "eye-disabled"]);
    }

    #[test]
    fn empty_dir_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_icon_dir(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_dir_is_read_error() {
        let err = read_icon_dir(Path::new("/nonexistent/icons")).unwrap_err();
        assert!(matches!(err, BuildError::Read { .. }));
    }
}
