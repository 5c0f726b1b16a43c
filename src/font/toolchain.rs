//! External font-conversion toolchain.
//!
//! The font build chains three opaque transforms: SVG icon set → SVG font →
//! TTF → WOFF. The tools behind them are a black box; the pipeline only
//! needs to invoke them with fixed parameters, read their bytes back, and
//! trust that they are deterministic over deterministic input. This module
//! isolates that seam behind [`FontToolchain`] so the deterministic core
//! (ordering, scaling, codepoint mapping) never touches process invocation,
//! and tests can substitute an in-process implementation.
//!
//! Every stage receives an explicit working directory owned by the calling
//! build. Tools read and write only inside it, so nothing is left behind on
//! any exit path and concurrent builds cannot collide.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

// ============================================================================
// FontToolchain
// ============================================================================

/// Parameters for the SVG-set to SVG-font transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgFontParams {
    /// Font family name baked into the generated font.
    pub font_name: String,

    /// Em height of the design grid, in font units.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Ascent in font units. `ascent + descent` should equal `height`.
    #[serde(default = "default_ascent")]
    pub ascent: u32,

    /// Descent in font units.
    #[serde(default = "default_descent")]
    pub descent: u32,

    /// Normalize icons to the em height.
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Give every glyph the same advance width.
    #[serde(default = "default_true")]
    pub fixed_width: bool,
}

fn default_height() -> u32 {
    1000
}

fn default_ascent() -> u32 {
    850
}

fn default_descent() -> u32 {
    150
}

fn default_true() -> bool {
    true
}

impl SvgFontParams {
    /// Conventional parameters: 1000-unit em, 850/150 ascent/descent,
    /// normalized, fixed width.
    pub fn new(font_name: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            height: 1000,
            ascent: 850,
            descent: 150,
            normalize: true,
            fixed_width: true,
        }
    }
}

/// The three chained font transforms, each synchronous and fatal on failure.
pub trait FontToolchain {
    /// Builds an SVG font from the ordered icon source files.
    ///
    /// Codepoint assignment order inside the font follows the order of
    /// `sources`; that is the toolchain's contract, not something the caller
    /// can enforce after the fact.
    fn svg_set_to_svg_font(
        &self,
        sources: &[PathBuf],
        params: &SvgFontParams,
        workdir: &Path,
    ) -> Result<Vec<u8>, BuildError>;

    /// Converts an SVG font to TTF.
    fn svg_font_to_ttf(&self, svg_font: &[u8], workdir: &Path) -> Result<Vec<u8>, BuildError>;

    /// Converts a TTF to WOFF.
    fn ttf_to_woff(&self, ttf: &[u8], workdir: &Path) -> Result<Vec<u8>, BuildError>;
}

// ============================================================================
// CommandToolchain
// ============================================================================

/// [`FontToolchain`] implemented by shelling out to the conventional npm
/// tooling (`svgicons2svgfont`, `svg2ttf`, `ttf2woff`).
///
/// Binary paths are configurable so a build can point at a local
/// `node_modules/.bin` instead of `$PATH`.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    pub svgicons2svgfont: PathBuf,
    pub svg2ttf: PathBuf,
    pub ttf2woff: PathBuf,
}

impl Default for CommandToolchain {
    fn default() -> Self {
        Self {
            svgicons2svgfont: PathBuf::from("svgicons2svgfont"),
            svg2ttf: PathBuf::from("svg2ttf"),
            ttf2woff: PathBuf::from("ttf2woff"),
        }
    }
}

impl CommandToolchain {
    fn run(program: &Path, args: &[&str]) -> Result<(), BuildError> {
        let tool = program.to_string_lossy().into_owned();
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| BuildError::toolchain(tool.as_str(), e.to_string()))?;
        if !output.status.success() {
            return Err(BuildError::toolchain(
                tool.as_str(),
                format!(
                    "exit status {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(())
    }

    fn read_back(path: &Path, tool: &Path) -> Result<Vec<u8>, BuildError> {
        fs::read(path).map_err(|e| {
            BuildError::toolchain(
                tool.to_string_lossy(),
                format!("produced no readable output at {}: {e}", path.display()),
            )
        })
    }

    fn stage(workdir: &Path, bytes: &[u8], name: &str) -> Result<PathBuf, BuildError> {
        let path = workdir.join(name);
        fs::write(&path, bytes).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl FontToolchain for CommandToolchain {
    fn svg_set_to_svg_font(
        &self,
        sources: &[PathBuf],
        params: &SvgFontParams,
        workdir: &Path,
    ) -> Result<Vec<u8>, BuildError> {
        let out = workdir.join("font.svg");
        let mut args = vec![
            format!("--fontname={}", params.font_name),
            format!("--height={}", params.height),
            format!("--ascent={}", params.ascent),
            format!("--descent={}", params.descent),
        ];
        if params.normalize {
            args.push("--normalize".into());
        }
        if params.fixed_width {
            args.push("--fixedWidth".into());
        }
        args.push("-o".into());
        args.push(out.to_string_lossy().into_owned());
        for source in sources {
            args.push(source.to_string_lossy().into_owned());
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::run(&self.svgicons2svgfont, &args)?;
        Self::read_back(&out, &self.svgicons2svgfont)
    }

    fn svg_font_to_ttf(&self, svg_font: &[u8], workdir: &Path) -> Result<Vec<u8>, BuildError> {
        let input = Self::stage(workdir, svg_font, "font.svg")?;
        let out = workdir.join("font.ttf");
        let input_arg = input.to_string_lossy();
        let out_arg = out.to_string_lossy();
        Self::run(&self.svg2ttf, &["--ts=1", &input_arg, &out_arg])?;
        Self::read_back(&out, &self.svg2ttf)
    }

    fn ttf_to_woff(&self, ttf: &[u8], workdir: &Path) -> Result<Vec<u8>, BuildError> {
        let input = Self::stage(workdir, ttf, "font.ttf")?;
        let out = workdir.join("font.woff");
        let input_arg = input.to_string_lossy();
        let out_arg = out.to_string_lossy();
        Self::run(&self.ttf2woff, &[&input_arg, &out_arg])?;
        Self::read_back(&out, &self.ttf2woff)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_convention() {
        let params = SvgFontParams::new("lumo-icons");
        assert_eq!(params.height, 1000);
        assert_eq!(params.ascent, 850);
        assert_eq!(params.descent, 150);
        assert!(params.normalize);
        assert!(params.fixed_width);
        assert_eq!(params.ascent + params.descent, params.height);
    }

    #[test]
    fn missing_binary_is_toolchain_error() {
        let toolchain = CommandToolchain {
            svgicons2svgfont: PathBuf::from("/nonexistent/svgicons2svgfont"),
            ..Default::default()
        };
        let workdir = tempfile::tempdir().unwrap();
        let err = toolchain
            .svg_set_to_svg_font(&[], &SvgFontParams::new("x"), workdir.path())
            .unwrap_err();
        assert!(matches!(err, BuildError::Toolchain { .. }));
    }
}
