//! Document parsing and static site generation for Stencil.
//!
//! This crate provides:
//! - [`Document`]: a source document split into [`Metadata`] and content
//! - [`reset_output_directory`]: safe creation or wiping of the output directory
//! - [`SiteGenerator`]: discovery, rendering, and writing of every page
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use stencil_site::generate_site;
//!
//! // Renders source/*.rst with templates from source/layout/
//! let outcome = generate_site("source", "output", false)?;
//! if !outcome.is_success() {
//!     // output/ already exists; pass force_deletion = true to wipe it
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod generator;
mod observer;
mod output;

pub use document::{
    DELIMITER, Document, LAYOUT_KEY, Metadata, MetadataError, discover_documents, split,
};
pub use error::BuildError;
pub use generator::{
    BuildOutcome, BuildSummary, CONTENT_KEY, GeneratorConfig, RenderedPage, SiteGenerator,
    destination_name, generate_site,
};
pub use observer::{BuildObserver, NullObserver, TracingObserver};
pub use output::{ResetOutcome, reset_output_directory};
