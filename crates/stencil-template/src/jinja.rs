//! Jinja-style templates via minijinja.
//!
//! Templates are loaded lazily from a layout directory. Template identifiers
//! are paths relative to that directory (e.g. `"base.html"`,
//! `"partials/nav.html"`).

use std::error::Error;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment, ErrorKind, Value};
use pulldown_cmark::{Options, Parser};

use crate::{Context, TemplateError, TemplateRenderer};

/// Renderer backed by a minijinja [`Environment`] with a path loader.
///
/// Auto-escaping is disabled for every template, so values (including the
/// document content) are inserted verbatim. Templates that want the content
/// interpreted as markdown can opt in with `{{ content | markdown }}`.
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Create a renderer loading templates from `layout_dir`.
    ///
    /// The directory is not checked here; a missing directory surfaces as
    /// [`TemplateError::NotFound`] on first render.
    #[must_use]
    pub fn new(layout_dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(layout_dir.into()));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("markdown", markdown);

        Self { env }
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(template).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound(template.to_owned())
            } else {
                render_error(template, &e)
            }
        })?;

        tmpl.render(context).map_err(|e| render_error(template, &e))
    }
}

fn render_error(template: &str, err: &minijinja::Error) -> TemplateError {
    TemplateError::Render {
        template: template.to_owned(),
        message: error_chain(err),
    }
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}

/// `markdown` filter: convert CommonMark text to HTML.
fn markdown(value: String) -> Value {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut html = String::with_capacity(value.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, Parser::new_ext(&value, options));
    Value::from_safe_string(html)
}
