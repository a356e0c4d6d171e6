//! The seam between the evaluator and a template engine.

use std::io::Error as IoError;

use handlebars::{Context, Handlebars, Output, RenderContext, Renderable, Template};
use serde_json::Value as Json;
use thiserror::Error;

/// Failure reported by a template engine while compiling or rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A template engine the evaluator can compile and render sub-templates with.
///
/// `render` may be called while another `render` on the same engine is in
/// progress (a sub-template evaluating another sub-template), so
/// implementations must not keep per-render state on the engine itself.
pub trait TemplateEngine {
    /// An opaque compiled template handle.
    type Compiled: Send + Sync;

    fn compile(&self, name: &str, source: &str) -> Result<Self::Compiled, EngineError>;

    fn render(&self, compiled: &Self::Compiled, context: &Json) -> Result<String, EngineError>;
}

/// Collects rendered text.
#[derive(Default)]
struct TextOutput(String);

impl Output for TextOutput {
    fn write(&mut self, seg: &str) -> Result<(), IoError> {
        self.0.push_str(seg);
        Ok(())
    }
}

impl TemplateEngine for Handlebars<'_> {
    type Compiled = Template;

    fn compile(&self, name: &str, source: &str) -> Result<Template, EngineError> {
        Template::compile(source).map_err(|e| EngineError::new(format!("{name}: {e}")))
    }

    /// Render with a fresh render context, so nested renders share no state
    /// beyond the registry itself.
    fn render(&self, compiled: &Template, context: &Json) -> Result<String, EngineError> {
        let context = Context::from(context.clone());
        let mut render_context = RenderContext::new(None);
        let mut output = TextOutput::default();
        compiled
            .render(self, &context, &mut render_context, &mut output)
            .map_err(|e| EngineError::new(e.to_string()))?;
        Ok(output.0)
    }
}
