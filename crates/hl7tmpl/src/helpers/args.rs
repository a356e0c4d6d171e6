//! Decoding of helper arguments from template values.

use serde::Serialize;
use serde_json::{Number, Value as Json};

use crate::error::HelperError;
use crate::helpers::registry::Invocation;
use crate::resolver::InstanceSelector;
use crate::types::MessageTree;

/// Short name of a JSON value's type for error messages.
pub(crate) fn kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

/// Decode the message tree at `index`.
pub(crate) fn tree(invocation: &Invocation<'_>, index: usize) -> Result<MessageTree, HelperError> {
    match invocation.param(index) {
        Some(value @ Json::Array(_)) => MessageTree::from_json(value).map_err(|e| {
            HelperError::invalid_input(invocation.helper, format!("invalid message tree: {e}"))
        }),
        Some(other) => Err(HelperError::invalid_input(
            invocation.helper,
            format!(
                "expected a message tree (array of segments), got {}",
                kind(other)
            ),
        )),
        None => Err(HelperError::invalid_input(
            invocation.helper,
            "missing message tree argument",
        )),
    }
}

/// Decode the string at `index`; `what` names the argument in errors.
pub(crate) fn string<'a>(
    invocation: &Invocation<'a>,
    index: usize,
    what: &str,
) -> Result<&'a str, HelperError> {
    match invocation.param(index) {
        Some(Json::String(s)) => Ok(s.as_str()),
        Some(other) => Err(HelperError::invalid_input(
            invocation.helper,
            format!("expected {what} as a string, got {}", kind(other)),
        )),
        None => Err(HelperError::invalid_input(
            invocation.helper,
            format!("missing {what}"),
        )),
    }
}

/// Decode every argument from `from` on as a segment name.
pub(crate) fn names<'a>(
    invocation: &Invocation<'a>,
    from: usize,
) -> Result<Vec<&'a str>, HelperError> {
    (from..invocation.params.len())
        .map(|index| string(invocation, index, "a segment name"))
        .collect()
}

/// Decode a non-negative count given as a number or a numeric string.
pub(crate) fn count(
    invocation: &Invocation<'_>,
    index: usize,
    what: &str,
) -> Result<usize, HelperError> {
    let invalid = |found: &str| {
        HelperError::invalid_input(
            invocation.helper,
            format!("expected {what} as a non-negative integer, got {found}"),
        )
    };
    match invocation.param(index) {
        Some(Json::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid(&n.to_string())),
        Some(Json::String(s)) => s.trim().parse().map_err(|_| invalid(&format!("'{s}'"))),
        Some(other) => Err(invalid(kind(other))),
        None => Err(HelperError::invalid_input(
            invocation.helper,
            format!("missing {what}"),
        )),
    }
}

/// Decode a parent instance marker (a set ID, as a string or a number).
pub(crate) fn instance(
    invocation: &Invocation<'_>,
    index: usize,
) -> Result<InstanceSelector, HelperError> {
    match invocation.param(index) {
        Some(Json::String(s)) => Ok(InstanceSelector::SetId(s.clone())),
        Some(Json::Number(n)) => Ok(InstanceSelector::SetId(set_id_text(n))),
        Some(other) => Err(HelperError::invalid_input(
            invocation.helper,
            format!("expected a parent set ID, got {}", kind(other)),
        )),
        None => Err(HelperError::invalid_input(
            invocation.helper,
            "missing parent set ID",
        )),
    }
}

/// Whole numbers print without a fraction, so `2.0` selects set ID `2`.
fn set_id_text(n: &Number) -> String {
    if let Some(whole) = n.as_i64() {
        return whole.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Serialize a helper result.
pub(crate) fn to_json<T: Serialize + ?Sized>(
    invocation: &Invocation<'_>,
    value: &T,
) -> Result<Json, HelperError> {
    serde_json::to_value(value).map_err(|e| {
        HelperError::invalid_input(invocation.helper, format!("cannot serialize result: {e}"))
    })
}
