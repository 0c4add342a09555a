//! Build progress reporting.
//!
//! The generator reports what it does through a [`BuildObserver`] instead of
//! logging directly. [`NullObserver`] discards everything;
//! [`TracingObserver`] forwards events to `tracing`.

use std::path::Path;

use crate::generator::{BuildSummary, RenderedPage};
use crate::output::ResetOutcome;

/// Receives build events. All methods default to doing nothing.
pub trait BuildObserver: Send + Sync {
    /// Source documents were discovered in `input_dir`.
    fn documents_discovered(&self, _input_dir: &Path, _count: usize) {}

    /// The output directory was reset (or left alone).
    fn output_reset(&self, _output_dir: &Path, _outcome: ResetOutcome) {}

    /// A page was rendered into the staging directory.
    fn page_rendered(&self, _page: &RenderedPage) {}

    /// Every page was moved into the output directory.
    fn build_finished(&self, _summary: &BuildSummary) {}
}

/// Observer that ignores all events.
pub struct NullObserver;

impl BuildObserver for NullObserver {}

/// Observer that emits `tracing` events.
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn documents_discovered(&self, input_dir: &Path, count: usize) {
        tracing::info!(input_dir = %input_dir.display(), count, "Generating site");
    }

    fn output_reset(&self, output_dir: &Path, outcome: ResetOutcome) {
        match outcome {
            ResetOutcome::Created => {
                tracing::info!(output_dir = %output_dir.display(), "Created output directory");
            }
            ResetOutcome::Recreated => {
                tracing::info!(output_dir = %output_dir.display(), "Reset output directory");
            }
            ResetOutcome::Exists => tracing::warn!(
                output_dir = %output_dir.display(),
                "The output directory already exists. Run with --force_deletion to force its deletion."
            ),
        }
    }

    fn page_rendered(&self, page: &RenderedPage) {
        tracing::info!(
            source = %page.source.display(),
            template = %page.template,
            "Writing {}",
            page.name.display()
        );
    }

    fn build_finished(&self, summary: &BuildSummary) {
        tracing::debug!(pages = summary.pages.len(), "Published staged pages");
    }
}
