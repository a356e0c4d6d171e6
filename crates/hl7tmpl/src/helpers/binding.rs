//! Binding of the helper table to a handlebars registry.

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson, Template, no_escape,
};
use serde_json::{Map, Value as Json};

use crate::helpers::registry::{HELPERS, HelperRegistry, HelperSpec};

/// One table entry registered as a handlebars helper.
///
/// Helpers return JSON values, so they are meant to be used as
/// subexpressions: `{{#with (getSegmentLists msg "OBX")}}{{#each OBX}}`.
struct HelperAdapter {
    spec: &'static HelperSpec,
    registry: Arc<HelperRegistry<Template>>,
}

impl HelperDef for HelperAdapter {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let params: Vec<&Json> = h.params().iter().map(|param| param.value()).collect();
        let hash: Map<String, Json> = h
            .hash()
            .iter()
            .map(|(key, value)| (key.to_string(), value.value().clone()))
            .collect();

        let value = self
            .registry
            .dispatch(r, self.spec, &params, &hash)
            .map_err(|e| RenderError::from(RenderErrorReason::Other(e.to_string())))?;
        Ok(ScopedJson::Derived(value))
    }
}

/// Register every helper on `handlebars`.
pub fn register_helpers(
    handlebars: &mut Handlebars<'_>,
    registry: &Arc<HelperRegistry<Template>>,
) {
    for spec in HELPERS {
        debug_assert!(!spec.name.is_empty() && !spec.description.is_empty());
        log::trace!("registering helper {}", spec.name);
        handlebars.register_helper(
            spec.name,
            Box::new(HelperAdapter {
                spec,
                registry: Arc::clone(registry),
            }),
        );
    }
}

/// A handlebars registry with all helpers registered.
///
/// HTML escaping is disabled: templates produce JSON, not HTML.
pub fn new_engine(registry: &Arc<HelperRegistry<Template>>) -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(no_escape);
    register_helpers(&mut handlebars, registry);
    handlebars
}
