//! Error types for icon asset builds.

use std::io;
use std::path::PathBuf;

/// Errors produced by the icon build pipelines.
///
/// Every variant is fatal: a build either produces all artifacts for an icon
/// family or produces none. There is no partial-success mode, because a
/// silently skipped icon would desynchronize the name-to-codepoint mapping
/// baked into the generated font.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An icon source file does not match the shape the pipeline requires
    /// (for the font pipeline: a single top-level `<path>` with a `d`
    /// attribute).
    #[error("malformed icon source {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    /// An external font-conversion tool exited non-zero or produced output
    /// the pipeline could not read back.
    #[error("{tool} failed: {message}")]
    Toolchain { tool: String, message: String },

    /// A source file or directory could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output artifact could not be written.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source or intermediate file is not well-formed XML.
    #[error("failed to parse {path} as XML")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// JSON serialization of a build configuration or manifest failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    /// Convenience constructor for [`BuildError::MalformedInput`].
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`BuildError::Toolchain`].
    pub(crate) fn toolchain(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Toolchain {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
