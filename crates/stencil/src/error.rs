//! CLI error types.

use std::path::PathBuf;

use stencil_config::ConfigError;
use stencil_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error(
        "Output directory {} already exists; run with --force_deletion to replace it",
        .0.display()
    )]
    DestinationExists(PathBuf),

    #[error("{0}")]
    Validation(String),
}
