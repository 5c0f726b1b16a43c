//! Command-line front end for the icon asset builds.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use iconsmith::{
    BuildError, CommandToolchain, FontBuild, GridIconsetBuild, IconsetBuild, SvgFontParams,
};

#[derive(Parser)]
#[command(name = "iconsmith", about = "Build iconset modules and icon fonts from SVG icon directories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an inline SVG iconset registration module.
    Iconset {
        /// Icon family name (id namespace and registry key).
        #[arg(long)]
        family: String,

        /// Directory of *.svg source files.
        #[arg(long)]
        source_dir: PathBuf,

        /// Output path for the generated module.
        #[arg(long)]
        output: PathBuf,

        /// Nominal icon size passed to the registry.
        #[arg(long, default_value_t = 16)]
        size: u32,

        /// Import specifier for the iconset registry module.
        #[arg(long, default_value = "./iconset.js")]
        registry_import: String,

        /// File whose contents are prepended as the license header.
        #[arg(long)]
        header_file: Option<PathBuf>,
    },

    /// Build an iconset module with paths scaled into the font design grid.
    GridIconset {
        #[arg(long)]
        family: String,

        #[arg(long)]
        source_dir: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Grid the source icons are authored on.
        #[arg(long, default_value_t = 24.0)]
        source_grid: f64,

        /// Target design grid in font units per em.
        #[arg(long, default_value_t = 1000.0)]
        em_size: f64,

        /// Nominal icon size passed to the registry.
        #[arg(long, default_value_t = 16)]
        size: u32,

        /// Import specifier for the iconset registry module.
        #[arg(long, default_value = "./iconset.js")]
        registry_import: String,

        #[arg(long)]
        header_file: Option<PathBuf>,
    },

    /// Build an icon font stylesheet and glyph manifest via the external
    /// font toolchain.
    Font {
        /// Font family name baked into the generated font.
        #[arg(long)]
        font_name: String,

        #[arg(long)]
        source_dir: PathBuf,

        /// Output path for the CSS stylesheet.
        #[arg(long)]
        stylesheet: PathBuf,

        /// Output path for the glyph-name JSON manifest.
        #[arg(long)]
        manifest: PathBuf,

        /// Custom-property prefix; defaults to the font name without its
        /// `-icons` suffix.
        #[arg(long)]
        css_prefix: Option<String>,

        /// Path to the svgicons2svgfont binary.
        #[arg(long, default_value = "svgicons2svgfont")]
        svgicons2svgfont: PathBuf,

        /// Path to the svg2ttf binary.
        #[arg(long, default_value = "svg2ttf")]
        svg2ttf: PathBuf,

        /// Path to the ttf2woff binary.
        #[arg(long, default_value = "ttf2woff")]
        ttf2woff: PathBuf,

        #[arg(long)]
        header_file: Option<PathBuf>,
    },
}

fn read_header(path: Option<&PathBuf>) -> Result<String, BuildError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.clone(),
            source,
        }),
        None => Ok(String::new()),
    }
}

fn run(cli: Cli) -> Result<(), BuildError> {
    match cli.command {
        Command::Iconset {
            family,
            source_dir,
            output,
            size,
            registry_import,
            header_file,
        } => IconsetBuild::new(family, source_dir, output)
            .with_size(size)
            .with_registry_import(registry_import)
            .with_header(read_header(header_file.as_ref())?)
            .run(),

        Command::GridIconset {
            family,
            source_dir,
            output,
            source_grid,
            em_size,
            size,
            registry_import,
            header_file,
        } => GridIconsetBuild::new(family, source_dir, output)
            .with_grids(source_grid, em_size)
            .with_size(size)
            .with_registry_import(registry_import)
            .with_header(read_header(header_file.as_ref())?)
            .run(),

        Command::Font {
            font_name,
            source_dir,
            stylesheet,
            manifest,
            css_prefix,
            svgicons2svgfont,
            svg2ttf,
            ttf2woff,
            header_file,
        } => {
            let mut build = FontBuild::new(SvgFontParams::new(font_name), source_dir)
                .with_stylesheet_path(stylesheet)
                .with_manifest_path(manifest)
                .with_header(read_header(header_file.as_ref())?);
            if let Some(prefix) = css_prefix {
                build = build.with_css_prefix(prefix);
            }
            let toolchain = CommandToolchain {
                svgicons2svgfont,
                svg2ttf,
                ttf2woff,
            };
            build.run(&toolchain)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
