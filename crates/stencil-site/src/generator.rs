//! Static site generation.
//!
//! [`SiteGenerator`] turns every source document in an input directory into
//! one output page:
//!
//! 1. Discover source documents (non-recursive, by extension)
//! 2. Reset the output directory
//! 3. For each document: parse → resolve layout → render → write
//!
//! Pages are written to a staging directory next to the output directory
//! and moved into place only after every document rendered. A failing
//! document therefore leaves the output directory empty rather than
//! half-populated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use stencil_template::{Context, JinjaRenderer, TemplateError, TemplateRenderer};
use tempfile::TempDir;

use crate::BuildError;
use crate::document::{Document, discover_documents};
use crate::observer::{BuildObserver, NullObserver};
use crate::output::{parent_dir, reset_output_directory};

/// Context key holding the document content. Metadata may not define it.
pub const CONTENT_KEY: &str = "content";

/// Prefix of the staging directory created next to the output directory.
const STAGING_PREFIX: &str = ".stencil-staging-";

/// Configuration for [`SiteGenerator`].
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Directory containing source documents.
    pub input_dir: PathBuf,
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
    /// Template directory, relative to `input_dir` unless absolute.
    pub layout_dir: PathBuf,
    /// Extension of source documents, without the dot.
    pub content_extension: String,
    /// Extension of rendered pages, without the dot.
    pub output_extension: String,
    /// Wipe an existing output directory instead of aborting.
    pub force_deletion: bool,
}

impl GeneratorConfig {
    /// Create a configuration with default layout directory and extensions.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            layout_dir: PathBuf::from("layout"),
            content_extension: "rst".to_owned(),
            output_extension: "html".to_owned(),
            force_deletion: false,
        }
    }

    /// Set whether an existing output directory is wiped.
    #[must_use]
    pub fn with_force_deletion(mut self, force_deletion: bool) -> Self {
        self.force_deletion = force_deletion;
        self
    }

    /// Resolved template directory.
    #[must_use]
    pub fn layout_path(&self) -> PathBuf {
        self.input_dir.join(&self.layout_dir)
    }
}

/// A page produced from one source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Source document path.
    pub source: PathBuf,
    /// Output file name (e.g. `page.html`).
    pub name: PathBuf,
    /// Template used to render the page.
    pub template: String,
}

/// Pages written by a completed run, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Rendered pages.
    pub pages: Vec<RenderedPage>,
}

/// Result of a generation run that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Every document was rendered and written.
    Completed(BuildSummary),
    /// The output directory already exists and deletion was not forced.
    /// Nothing was written.
    DestinationExists(PathBuf),
}

impl BuildOutcome {
    /// Returns `true` if the site was generated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Generates a static site from a directory of source documents.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use stencil_site::{GeneratorConfig, SiteGenerator, TracingObserver};
/// use stencil_template::JinjaRenderer;
///
/// let config = GeneratorConfig::new("source", "output").with_force_deletion(true);
/// let renderer = Arc::new(JinjaRenderer::new(config.layout_path()));
/// let generator = SiteGenerator::new(config, renderer).with_observer(Arc::new(TracingObserver));
///
/// let outcome = generator.generate()?;
/// assert!(outcome.is_success());
/// # Ok(())
/// # }
/// ```
pub struct SiteGenerator {
    config: GeneratorConfig,
    renderer: Arc<dyn TemplateRenderer>,
    observer: Arc<dyn BuildObserver>,
}

impl SiteGenerator {
    /// Create a generator reporting to [`NullObserver`].
    #[must_use]
    pub fn new(config: GeneratorConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            config,
            renderer,
            observer: Arc::new(NullObserver),
        }
    }

    /// Report build events to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run generation.
    ///
    /// Source documents are processed in file name order. The first failing
    /// document aborts the run; later documents are not processed.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Io`] if the input directory cannot be read (the
    /// output directory is then left untouched), and any error from
    /// resetting the output directory or processing a document.
    pub fn generate(&self) -> Result<BuildOutcome, BuildError> {
        let config = &self.config;

        let sources = discover_documents(&config.input_dir, &config.content_extension)?;
        self.observer
            .documents_discovered(&config.input_dir, sources.len());

        let reset = reset_output_directory(&config.output_dir, config.force_deletion)?;
        self.observer.output_reset(&config.output_dir, reset);
        if !reset.is_reset() {
            return Ok(BuildOutcome::DestinationExists(config.output_dir.clone()));
        }

        let staging = staging_dir(&config.output_dir)?;
        let mut summary = BuildSummary::default();
        for source in &sources {
            let page = self.build_page(source, staging.path())?;
            self.observer.page_rendered(&page);
            summary.pages.push(page);
        }

        publish(staging, &config.output_dir)?;
        self.observer.build_finished(&summary);

        Ok(BuildOutcome::Completed(summary))
    }

    /// Parse, render, and write a single document into `staging`.
    fn build_page(&self, source: &Path, staging: &Path) -> Result<RenderedPage, BuildError> {
        let text = fs::read_to_string(source)?;
        let malformed = |e| BuildError::MalformedMetadata {
            path: source.to_path_buf(),
            source: e,
        };

        let document = Document::parse(&text).map_err(malformed)?;
        let template = document.metadata.layout().map_err(malformed)?.to_owned();
        let context = render_context(source, document)?;

        let html = self
            .renderer
            .render(&template, &context)
            .map_err(|e| match e {
                TemplateError::NotFound(template) => BuildError::MissingTemplate {
                    path: source.to_path_buf(),
                    template,
                },
                TemplateError::Render { .. } => BuildError::Render {
                    path: source.to_path_buf(),
                    source: e,
                },
            })?;

        let name = destination_name(source, &self.config.output_extension).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no file name in {}", source.display()),
            )
        })?;
        fs::write(staging.join(&name), html)?;

        Ok(RenderedPage {
            source: source.to_path_buf(),
            name,
            template,
        })
    }
}

/// Generate a site with the default layout directory and extensions,
/// rendering templates with [`JinjaRenderer`].
///
/// # Errors
///
/// See [`SiteGenerator::generate`].
pub fn generate_site(
    input_dir: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    force_deletion: bool,
) -> Result<BuildOutcome, BuildError> {
    let config = GeneratorConfig::new(input_dir, output_dir).with_force_deletion(force_deletion);
    let renderer = Arc::new(JinjaRenderer::new(config.layout_path()));
    SiteGenerator::new(config, renderer).generate()
}

/// Build the template context: all metadata keys plus `content`.
fn render_context(source: &Path, document: Document) -> Result<Context, BuildError> {
    if document.metadata.contains_key(CONTENT_KEY) {
        return Err(BuildError::ReservedKeyConflict {
            path: source.to_path_buf(),
            key: CONTENT_KEY,
        });
    }

    let mut context = document.metadata.into_map();
    context.insert(CONTENT_KEY.to_owned(), Value::String(document.content));
    Ok(context)
}

/// Output file name: source base name with `extension`.
///
/// `notes/page.rst` with `html` gives `page.html`. The base name is kept
/// byte for byte, including names that are not valid UTF-8.
pub fn destination_name(source: &Path, extension: &str) -> Option<PathBuf> {
    source
        .file_name()
        .map(|name| Path::new(name).with_extension(extension))
}

/// Create the staging directory next to `output_dir`, falling back to the
/// system temp directory.
fn staging_dir(output_dir: &Path) -> io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent_dir(output_dir))
        .or_else(|_| tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir())
}

/// Move every staged page into `output_dir` and remove the staging directory.
fn publish(staging: TempDir, output_dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(staging.path())? {
        let entry = entry?;
        let target = output_dir.join(entry.file_name());
        if fs::rename(entry.path(), &target).is_err() {
            // Cross-device staging directory
            fs::copy(entry.path(), &target)?;
        }
    }
    staging.close()
}
