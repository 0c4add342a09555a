//! Template error types.

/// Error returned by a [`TemplateRenderer`](crate::TemplateRenderer).
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template with this identifier exists.
    #[error("Template not found: {0}")]
    NotFound(String),
    /// The template was found but failed to render.
    #[error("Failed to render template {template}: {message}")]
    Render {
        /// Template identifier.
        template: String,
        /// Engine error message.
        message: String,
    },
}
