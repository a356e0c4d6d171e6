//! Implementations of the registered helpers.
//!
//! Each helper decodes its arguments, calls the typed resolver or
//! evaluator, and shapes the result into the JSON the template sees.

use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::error::HelperError;
use crate::evaluate::{Evaluator, TemplateEngine};
use crate::helpers::args;
use crate::helpers::registry::Invocation;
use crate::resolver;
use crate::types::{Field, Repeat};

/// `getSegmentLists tree name...` -> `{name: [segment...]}`
pub(crate) fn get_segment_lists(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let tree = args::tree(invocation, 0)?;
    let names = args::names(invocation, 1)?;
    let lists = resolver::segment_lists(&tree, &names);
    args::to_json(invocation, &lists)
}

/// `getFirstSegments tree name...` -> `{name: segment}`, `[]` when missing.
pub(crate) fn get_first_segments(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let tree = args::tree(invocation, 0)?;
    let names = args::names(invocation, 1)?;
    let mut result = Map::new();
    for (name, segment) in resolver::first_segments(&tree, &names) {
        let value = match segment {
            Some(segment) => args::to_json(invocation, segment)?,
            None => Json::Array(Vec::new()),
        };
        result.insert(name, value);
    }
    Ok(Json::Object(result))
}

/// `hasSegments tree name...` -> bool
pub(crate) fn has_segments(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let tree = args::tree(invocation, 0)?;
    let names = args::names(invocation, 1)?;
    Ok(Json::Bool(resolver::has_segments(&tree, &names)))
}

/// `getParentSegment tree child maxDistance parent` -> `{parent: segment | null}`
pub(crate) fn get_parent_segment(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let tree = args::tree(invocation, 0)?;
    let child = args::string(invocation, 1, "the child segment name")?;
    let max_distance = args::count(invocation, 2, "the maximum distance")?;
    let parent = args::string(invocation, 3, "the parent segment name")?;

    let value = match resolver::parent_segment(&tree, child, max_distance, parent) {
        Some(segment) => args::to_json(invocation, segment)?,
        None => Json::Null,
    };
    let mut result = Map::new();
    result.insert(parent.to_string(), value);
    Ok(Json::Object(result))
}

/// `getRelatedSegmentList tree parent setId child` -> `{child: [segment...]}`
pub(crate) fn get_related_segment_list(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let tree = args::tree(invocation, 0)?;
    let parent = args::string(invocation, 1, "the parent segment name")?;
    let instance = args::instance(invocation, 2)?;
    let child = args::string(invocation, 3, "the child segment name")?;

    let related =
        resolver::related_segment_list(&tree, parent, &instance, child, invocation.policy);
    let mut result = Map::new();
    result.insert(child.to_string(), args::to_json(invocation, &related)?);
    Ok(Json::Object(result))
}

/// `getFieldRepeats field` -> `[repeat...]`, or `null` for an absent field.
pub(crate) fn get_field_repeats(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let field = match invocation.param(0) {
        None | Some(Json::Null) => None,
        Some(Json::String(s)) => Some(Field::Scalar(s.clone())),
        Some(value @ Json::Array(_)) => {
            let repeats = Vec::<Repeat>::deserialize(value).map_err(|e| {
                HelperError::invalid_input(
                    invocation.helper,
                    format!("field is not a list of repeats: {e}"),
                )
            })?;
            Some(Field::Repeats(repeats))
        }
        Some(other) => {
            return Err(HelperError::invalid_input(
                invocation.helper,
                format!("expected a parsed field value, got {}", args::kind(other)),
            ));
        }
    };

    match resolver::field_repeats(field.as_ref())? {
        Some(repeats) => args::to_json(invocation, repeats),
        None => Ok(Json::Null),
    }
}

/// `toJsonString value` -> the value as compact JSON text.
pub(crate) fn to_json_string(invocation: &Invocation<'_>) -> Result<Json, HelperError> {
    let value = invocation.param(0).unwrap_or(&Json::Null);
    serde_json::to_string(value)
        .map(Json::String)
        .map_err(|e| HelperError::invalid_input(invocation.helper, e.to_string()))
}

/// `evaluate name [context] key=value...` -> the sub-template's JSON output.
///
/// The context is the hash arguments, layered over the optional second
/// positional argument when that is an object.
pub(crate) fn evaluate<E>(
    invocation: &Invocation<'_>,
    evaluator: &Evaluator<E::Compiled>,
    engine: &E,
) -> Result<Json, HelperError>
where
    E: TemplateEngine + ?Sized,
{
    let name = args::string(invocation, 0, "a template name")?;

    let mut context = match invocation.param(1) {
        None | Some(Json::Null) => Map::new(),
        Some(Json::Object(base)) => base.clone(),
        Some(other) => {
            return Err(HelperError::invalid_input(
                invocation.helper,
                format!("expected the context as an object, got {}", args::kind(other)),
            ));
        }
    };
    for (key, value) in invocation.hash {
        context.insert(key.clone(), value.clone());
    }

    evaluator.evaluate(engine, name, &Json::Object(context))
}
