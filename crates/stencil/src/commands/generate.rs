//! `stencil generate` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use stencil_config::{CliSettings, Config, SiteConfig};
use stencil_site::{BuildOutcome, GeneratorConfig, SiteGenerator, TracingObserver};
use stencil_template::JinjaRenderer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Directory containing source documents and the layout directory (overrides config).
    input_dir: Option<PathBuf>,

    /// Directory to write generated pages to (overrides config).
    output_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn(ing), error, critical or off (default: RUST_LOG, then info).
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Delete the output directory if it already exists.
    #[arg(long = "force_deletion", visible_alias = "force-deletion")]
    force_deletion: bool,

    /// Path to configuration file (default: auto-discover stencil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, generation fails, or the
    /// output directory exists and deletion was not forced.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.input_dir,
            output_dir: self.output_dir,
            force_deletion: self.force_deletion.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;

        output.info(&format!("Source: {}", site.source_dir.display()));
        output.info(&format!("Output: {}", site.output_dir.display()));

        let generator_config = generator_config(site);
        let renderer = Arc::new(JinjaRenderer::new(generator_config.layout_path()));
        let generator =
            SiteGenerator::new(generator_config, renderer).with_observer(Arc::new(TracingObserver));

        match generator.generate()? {
            BuildOutcome::Completed(summary) => {
                output.success(&format!(
                    "Generated {} pages in {}",
                    summary.pages.len(),
                    site.output_dir.display()
                ));
                Ok(())
            }
            BuildOutcome::DestinationExists(path) => {
                output.warning("Nothing was generated.");
                Err(CliError::DestinationExists(path))
            }
        }
    }
}

/// Build the generator configuration from resolved site settings.
fn generator_config(site: &SiteConfig) -> GeneratorConfig {
    GeneratorConfig {
        input_dir: site.source_dir.clone(),
        output_dir: site.output_dir.clone(),
        layout_dir: site.layout_dir.clone(),
        content_extension: site.content_extension.clone(),
        output_extension: site.output_extension.clone(),
        force_deletion: site.force_deletion,
    }
}
