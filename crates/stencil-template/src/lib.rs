//! Template rendering for Stencil.
//!
//! This crate provides:
//! - [`TemplateRenderer`]: the rendering capability the site generator calls into
//! - [`JinjaRenderer`]: a minijinja-backed renderer loading templates from a layout directory
//! - `MockRenderer`: an in-memory renderer for tests (requires the `mock` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use stencil_template::{Context, JinjaRenderer, TemplateRenderer};
//!
//! let renderer = JinjaRenderer::new("source/layout");
//! let mut context = Context::new();
//! context.insert("title".to_owned(), "Hi".into());
//!
//! let html = renderer.render("base.html", &context)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod jinja;
#[cfg(feature = "mock")]
mod mock;

pub use error::TemplateError;
pub use jinja::JinjaRenderer;
#[cfg(feature = "mock")]
pub use mock::MockRenderer;

/// Data passed to a template: an ordered mapping of names to JSON values.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Renders a named template against a context.
///
/// Implementations own template lookup. Callers only see the template
/// identifier (e.g. `"base.html"`) and get back rendered text.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the template cannot be located
    /// and [`TemplateError::Render`] if evaluation fails.
    fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError>;
}
