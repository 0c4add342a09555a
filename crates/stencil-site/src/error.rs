//! Site generation error types.

use std::io;
use std::path::{Path, PathBuf};

use stencil_template::TemplateError;

use crate::document::MetadataError;

/// Error returned when site generation fails.
///
/// Every variant aborts the run. An existing output directory is not an
/// error; it is reported as [`BuildOutcome::DestinationExists`](crate::BuildOutcome).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A document's metadata block is not a JSON object or lacks a string `layout`.
    #[error("Malformed metadata in {}: {source}", path.display())]
    MalformedMetadata {
        /// Source document path.
        path: PathBuf,
        /// Parse failure.
        source: MetadataError,
    },
    /// The template named by `layout` does not exist.
    #[error("Template not found: {template} (layout of {})", path.display())]
    MissingTemplate {
        /// Source document path.
        path: PathBuf,
        /// Template identifier.
        template: String,
    },
    /// The metadata defines a key the generator reserves for itself.
    #[error("Metadata in {} defines reserved key \"{key}\"", path.display())]
    ReservedKeyConflict {
        /// Source document path.
        path: PathBuf,
        /// Reserved key name.
        key: &'static str,
    },
    /// The template engine failed.
    #[error("Failed to render {}: {source}", path.display())]
    Render {
        /// Source document path.
        path: PathBuf,
        /// Renderer failure.
        source: TemplateError,
    },
    /// The output path exists but is not a directory.
    #[error("Output path exists and is not a directory: {}", .0.display())]
    DestinationConflict(PathBuf),
    /// Filesystem error, passed through unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BuildError {
    /// Path of the source document the error relates to, if any.
    #[must_use]
    pub fn document(&self) -> Option<&Path> {
        match self {
            Self::MalformedMetadata { path, .. }
            | Self::MissingTemplate { path, .. }
            | Self::ReservedKeyConflict { path, .. }
            | Self::Render { path, .. } => Some(path.as_path()),
            Self::DestinationConflict(_) | Self::Io(_) => None,
        }
    }
}
