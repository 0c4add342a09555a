//! Mock renderer implementation for testing.
//!
//! Provides [`MockRenderer`] for unit testing without a template engine or
//! layout directory on disk.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::{Context, TemplateError, TemplateRenderer};

/// Mock renderer for testing.
///
/// Stores templates in memory and performs plain `{{key}}` substitution
/// (whitespace inside the braces is allowed). Every render call is recorded
/// so tests can assert on the context the caller built.
///
/// # Example
///
/// ```ignore
/// use stencil_template::{Context, MockRenderer, TemplateRenderer};
///
/// let renderer = MockRenderer::new().with_template("base.html", "<h1>{{title}}</h1>");
/// let html = renderer.render("base.html", &context)?;
/// ```
#[derive(Debug, Default)]
pub struct MockRenderer {
    templates: HashMap<String, String>,
    failures: HashMap<String, String>,
    calls: RwLock<Vec<(String, Context)>>,
}

impl MockRenderer {
    /// Create a new mock renderer without templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template body under `name`.
    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(name.into(), body.into());
        self
    }

    /// Register a template that always fails to render with `message`.
    #[must_use]
    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(name.into(), message.into());
        self
    }

    /// All render calls received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Context)> {
        self.calls.read().unwrap().clone()
    }
}

impl TemplateRenderer for MockRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        self.calls
            .write()
            .unwrap()
            .push((template.to_owned(), context.clone()));

        if let Some(message) = self.failures.get(template) {
            return Err(TemplateError::Render {
                template: template.to_owned(),
                message: message.clone(),
            });
        }

        let body = self
            .templates
            .get(template)
            .ok_or_else(|| TemplateError::NotFound(template.to_owned()))?;

        Ok(substitute(body, context))
    }
}

/// Replace `{{key}}` placeholders with context values.
///
/// Strings are inserted verbatim, other values as JSON. Unknown keys render
/// as an empty string.
fn substitute(body: &str, context: &Context) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = rest[start + 2..start + len].trim();
        match context.get(key) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => {}
        }
        rest = &rest[start + len + 2..];
    }

    out.push_str(rest);
    out
}
