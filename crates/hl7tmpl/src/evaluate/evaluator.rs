//! Sub-template evaluation: locate, compile once, render, parse as JSON.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use bon::bon;
use serde_json::Value as Json;

use crate::error::HelperError;
use crate::evaluate::cache::TemplateCache;
use crate::evaluate::engine::TemplateEngine;

pub(crate) const EVALUATE: &str = "evaluate";

/// Renders named sub-templates and returns their output as JSON.
///
/// The evaluator holds the template root and a compiled-template cache,
/// which may be shared with other evaluators. The root is consulted only on
/// a cache miss: once a name has been
/// compiled, later calls reuse the cached template even if the root has
/// changed or been cleared since.
///
/// # Example
///
/// ```
/// use handlebars::{Handlebars, Template};
/// use hl7tmpl::Evaluator;
/// use serde_json::json;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("child.hbs"), r#"{"a": "{{x}}"}"#).unwrap();
///
/// let evaluator: Evaluator<Template> = Evaluator::builder()
///     .template_root(dir.path())
///     .build();
/// let engine = Handlebars::new();
///
/// let value = evaluator.evaluate(&engine, "child.hbs", &json!({"x": "1"})).unwrap();
/// assert_eq!(value, json!({"a": "1"}));
/// ```
pub struct Evaluator<T> {
    template_root: RwLock<Option<PathBuf>>,
    cache: Arc<TemplateCache<T>>,
}

#[bon]
impl<T> Evaluator<T> {
    /// Create an evaluator with an optional template root.
    ///
    /// Without a `cache` the evaluator starts with a fresh, empty one.
    #[builder]
    pub fn new(
        #[builder(into)] template_root: Option<PathBuf>,
        #[builder(default)] cache: Arc<TemplateCache<T>>,
    ) -> Self {
        Self {
            template_root: RwLock::new(template_root),
            cache,
        }
    }
}

impl<T> Default for Evaluator<T> {
    fn default() -> Self {
        Evaluator::builder().build()
    }
}

impl<T: Send + Sync> Evaluator<T> {
    /// The configured template root, if any. An empty path counts as unset.
    pub fn template_root(&self) -> Option<PathBuf> {
        self.template_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|root| !root.as_os_str().is_empty())
    }

    /// Change the template root. Cached templates are not affected.
    pub fn set_template_root(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        log::debug!("template root set to {}", root.display());
        *self
            .template_root
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(root);
    }

    pub fn clear_template_root(&self) {
        *self
            .template_root
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn cache(&self) -> &Arc<TemplateCache<T>> {
        &self.cache
    }

    /// Render the sub-template `name` against `context` and parse the output.
    ///
    /// On a cache miss the template is read from `<root>/<name>` and compiled;
    /// the compiled handle is cached under `name` before rendering. Rendering
    /// happens outside the cache lock, so the template may itself call
    /// `evaluate`.
    ///
    /// # Errors
    ///
    /// - [`HelperError::Resolution`] if `name` is not cached and cannot be
    ///   located (no root, invalid name, missing file).
    /// - [`HelperError::Compile`] / [`HelperError::Render`] for engine failures.
    /// - [`HelperError::Parse`] if the output is not JSON.
    pub fn evaluate<E>(&self, engine: &E, name: &str, context: &Json) -> Result<Json, HelperError>
    where
        E: TemplateEngine<Compiled = T> + ?Sized,
    {
        let compiled = self.compiled(engine, name)?;
        let rendered = engine
            .render(&compiled, context)
            .map_err(|e| HelperError::Render {
                helper: EVALUATE,
                name: name.to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&rendered).map_err(|source| HelperError::Parse {
            helper: EVALUATE,
            name: name.to_string(),
            source,
        })
    }

    /// The compiled template for `name`, compiling and caching it on a miss.
    pub fn compiled<E>(&self, engine: &E, name: &str) -> Result<Arc<T>, HelperError>
    where
        E: TemplateEngine<Compiled = T> + ?Sized,
    {
        self.cache.get_or_try_insert_with(name, || {
            let path = self.resolve(name)?;
            let source = fs::read_to_string(&path).map_err(|e| HelperError::Resolution {
                helper: EVALUATE,
                name: name.to_string(),
                reason: format!("failed to read '{}': {e}", path.display()),
            })?;
            log::debug!("compiling template '{name}' from {}", path.display());
            engine
                .compile(name, &source)
                .map_err(|e| HelperError::Compile {
                    helper: EVALUATE,
                    name: name.to_string(),
                    message: e.to_string(),
                })
        })
    }

    /// Resolve `name` against the current template root.
    fn resolve(&self, name: &str) -> Result<PathBuf, HelperError> {
        let resolution_error = |reason: String| HelperError::Resolution {
            helper: EVALUATE,
            name: name.to_string(),
            reason,
        };

        if !is_relative_name(name) {
            return Err(resolution_error(
                "template names must be relative paths inside the template root".to_string(),
            ));
        }
        let root = self
            .template_root()
            .ok_or_else(|| resolution_error("no template root is configured".to_string()))?;
        if !root.is_dir() {
            return Err(resolution_error(format!(
                "template root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(root.join(name))
    }
}

/// A non-empty relative path that cannot leave its root.
fn is_relative_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
