//! Build orchestration for the three pipelines.
//!
//! Each build is a plain serializable struct describing one icon family's
//! inputs and outputs, with a `run()` that executes the pipeline end to end.
//! Everything is single-threaded and strictly chained: each stage's output is
//! the next stage's required input, so there is nothing to parallelize.
//!
//! Builds are all-or-nothing. Every artifact's text is rendered fully in
//! memory before the first byte is written, so a failing build leaves
//! existing output files untouched and consumers can treat a crash as
//! "no change". The font build allocates a private temporary working
//! directory for its intermediate `.svg`/`.ttf`/`.woff` files and passes it
//! explicitly through the toolchain stages; the directory is removed on every
//! exit path, including toolchain failure.
//!
//! # Example
//!
//! ```no_run
//! use iconsmith::{FontBuild, IconsetBuild, CommandToolchain, SvgFontParams};
//!
//! let iconset = IconsetBuild::new("vaadin", "assets/svg", "vaadin-iconset.js");
//! iconset.run().unwrap();
//!
//! let font = FontBuild::new(SvgFontParams::new("lumo-icons"), "icons/svg")
//!     .with_stylesheet_path("src/props/icons.css")
//!     .with_manifest_path("test/glyphs.json");
//! font.run(&CommandToolchain::default()).unwrap();
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::emit;
use crate::error::BuildError;
use crate::font::{self, FontToolchain, SvgFontParams};
use crate::fragment::extract_fragment;
use crate::source::read_icon_dir;

fn default_size() -> u32 {
    16
}

fn default_registry_import() -> String {
    "./iconset.js".to_string()
}

fn default_em_size() -> f64 {
    1000.0
}

fn default_source_grid() -> f64 {
    24.0
}

/// Writes one artifact, creating parent directories as needed. A rebuild
/// fully overwrites whatever was there.
fn write_artifact(path: &Path, text: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, text).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// IconsetBuild
// ============================================================================

/// The iconset pipeline: SVG documents in, one sprite-sheet registration
/// module out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconsetBuild {
    /// Icon family name; becomes the id namespace (`<family>:<icon>`) and
    /// the registry key.
    pub family: String,

    /// Directory of `*.svg` source files.
    pub source_dir: PathBuf,

    /// Where the generated module is written.
    pub output_path: PathBuf,

    /// Nominal icon size passed to the registry.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Import specifier for the iconset registry module.
    #[serde(default = "default_registry_import")]
    pub registry_import: String,

    /// License header prepended to the output.
    #[serde(default)]
    pub header: String,
}

impl IconsetBuild {
    pub fn new(
        family: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            family: family.into(),
            source_dir: source_dir.into(),
            output_path: output_path.into(),
            size: default_size(),
            registry_import: default_registry_import(),
            header: String::new(),
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_registry_import(mut self, import: impl Into<String>) -> Self {
        self.registry_import = import.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Renders the module text without writing it.
    pub fn render(&self) -> Result<String, BuildError> {
        let sources = read_icon_dir(&self.source_dir)?;
        info!(family = %self.family, icons = sources.len(), "building iconset module");

        let fragments = sources
            .iter()
            .map(|s| {
                debug!(icon = %s.name, "extracting fragment");
                extract_fragment(&self.family, &s.name, &s.raw, &s.path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(emit::iconset_module(
            &self.header,
            &self.registry_import,
            &self.family,
            self.size,
            &fragments,
        ))
    }

    /// Runs the pipeline and writes the module.
    pub fn run(&self) -> Result<(), BuildError> {
        let module = self.render()?;
        write_artifact(&self.output_path, &module)
    }
}

// ============================================================================
// GridIconsetBuild
// ============================================================================

/// The direct-iconset variant of the font pipeline: single-path icons are
/// scaled from their authoring grid into the font design grid and emitted as
/// a synthetic `<defs>` iconset, without invoking the external toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridIconsetBuild {
    pub family: String,
    pub source_dir: PathBuf,
    pub output_path: PathBuf,

    /// Target design grid in font units per em.
    #[serde(default = "default_em_size")]
    pub em_size: f64,

    /// Grid the source icons are authored on. Validated against each
    /// source's `viewBox` when one is present.
    #[serde(default = "default_source_grid")]
    pub source_grid: f64,

    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default = "default_registry_import")]
    pub registry_import: String,

    #[serde(default)]
    pub header: String,
}

impl GridIconsetBuild {
    pub fn new(
        family: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            family: family.into(),
            source_dir: source_dir.into(),
            output_path: output_path.into(),
            em_size: default_em_size(),
            source_grid: default_source_grid(),
            size: default_size(),
            registry_import: default_registry_import(),
            header: String::new(),
        }
    }

    pub fn with_grids(mut self, source_grid: f64, em_size: f64) -> Self {
        self.source_grid = source_grid;
        self.em_size = em_size;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_registry_import(mut self, import: impl Into<String>) -> Self {
        self.registry_import = import.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Renders the module text without writing it.
    pub fn render(&self) -> Result<String, BuildError> {
        let sources = read_icon_dir(&self.source_dir)?;
        let scale = self.em_size / self.source_grid;
        info!(
            family = %self.family,
            icons = sources.len(),
            scale,
            "building grid-normalized iconset"
        );

        let fragments = sources
            .iter()
            .map(|s| {
                let path = font::extract_single_path(&s.raw, &s.path, Some(self.source_grid))?;
                let normalized = font::normalize(&path, scale);
                Ok(format!(
                    "<g id=\"{}:{}\">{}</g>",
                    self.family,
                    s.name,
                    normalized.to_element()
                ))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(emit::iconset_module(
            &self.header,
            &self.registry_import,
            &self.family,
            self.size,
            &fragments,
        ))
    }

    /// Runs the pipeline and writes the module.
    pub fn run(&self) -> Result<(), BuildError> {
        let module = self.render()?;
        write_artifact(&self.output_path, &module)
    }
}

// ============================================================================
// FontBuild
// ============================================================================

/// The icon font pipeline: SVG icons through the external toolchain to a
/// WOFF-embedding stylesheet plus a glyph-name manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontBuild {
    /// Parameters handed to the SVG-font stage.
    pub font: SvgFontParams,

    /// Directory of single-path `*.svg` source files.
    pub source_dir: PathBuf,

    /// Where the CSS stylesheet is written.
    pub stylesheet_path: PathBuf,

    /// Where the glyph-name JSON manifest is written.
    pub manifest_path: PathBuf,

    /// Prefix for the emitted custom properties
    /// (`--<prefix>-icons-<glyph>`).
    pub css_prefix: String,

    /// License header prepended to the stylesheet.
    #[serde(default)]
    pub header: String,
}

impl FontBuild {
    pub fn new(font: SvgFontParams, source_dir: impl Into<PathBuf>) -> Self {
        // `lumo-icons` emits `--lumo-icons-*` properties.
        let css_prefix = font
            .font_name
            .strip_suffix("-icons")
            .unwrap_or(&font.font_name)
            .to_string();
        Self {
            font,
            source_dir: source_dir.into(),
            stylesheet_path: PathBuf::from("icons.css"),
            manifest_path: PathBuf::from("glyphs.json"),
            css_prefix,
            header: String::new(),
        }
    }

    pub fn with_stylesheet_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet_path = path.into();
        self
    }

    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    pub fn with_css_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.css_prefix = prefix.into();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Runs the pipeline and writes both artifacts.
    pub fn run(&self, toolchain: &dyn FontToolchain) -> Result<(), BuildError> {
        let sources = read_icon_dir(&self.source_dir)?;
        info!(
            font = %self.font.font_name,
            icons = sources.len(),
            "building icon font"
        );

        // Validate every source before the toolchain sees any of them: one
        // malformed icon aborts the whole family with nothing written.
        for source in &sources {
            font::extract_single_path(&source.raw, &source.path, None)?;
        }

        let workdir = tempfile::tempdir().map_err(|source| BuildError::Write {
            path: env::temp_dir(),
            source,
        })?;

        let paths: Vec<PathBuf> = sources.iter().map(|s| s.path.clone()).collect();
        let svg_font = toolchain.svg_set_to_svg_font(&paths, &self.font, workdir.path())?;
        let ttf = toolchain.svg_font_to_ttf(&svg_font, workdir.path())?;
        let woff = toolchain.ttf_to_woff(&ttf, workdir.path())?;
        debug!(
            svg_font = svg_font.len(),
            ttf = ttf.len(),
            woff = woff.len(),
            "toolchain stages complete"
        );

        let svg_font_text = String::from_utf8_lossy(&svg_font);
        let glyphs = font::parse_glyph_table(&svg_font_text, &workdir.path().join("font.svg"))?;

        let names: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
        font::check_bijection(&glyphs, &names)?;

        let stylesheet = emit::font_stylesheet(
            &self.header,
            &self.font.font_name,
            &self.css_prefix,
            &woff,
            &glyphs,
        );
        let manifest = emit::glyph_manifest(&glyphs)?;

        write_artifact(&self.stylesheet_path, &stylesheet)?;
        write_artifact(&self.manifest_path, &manifest)?;
        Ok(())
        // `workdir` drops here (and on every early return above), removing
        // the intermediate .svg/.ttf/.woff files.
    }
}

// Keep the serde surface honest: builds round-trip through JSON so a family
// definition can live in a config file consumed by the CLI.
impl IconsetBuild {
    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl GridIconsetBuild {
    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FontBuild {
    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
