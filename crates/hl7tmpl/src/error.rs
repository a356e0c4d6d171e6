//! Error types for message trees and template helpers.

use strsim::levenshtein;
use thiserror::Error;

/// Errors raised while building a [`MessageTree`](crate::MessageTree).
#[derive(Debug, Error)]
pub enum TreeError {
    /// Segment positions must be strictly increasing in message order.
    #[error(
        "segment '{name}' at index {index} has position {position}, \
         which does not follow position {previous}"
    )]
    PositionOrder {
        name: String,
        index: usize,
        position: usize,
        previous: usize,
    },

    /// The value is not an array of segment objects.
    #[error("malformed message tree: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An error raised by a template helper.
///
/// Every variant raised for a specific helper call carries the helper name,
/// and the display text starts with it so the render error points at the
/// call site.
#[derive(Debug, Error)]
pub enum HelperError {
    /// A required argument is missing or has the wrong shape.
    #[error("{helper}: {message}")]
    InvalidInput {
        helper: &'static str,
        message: String,
    },

    /// A sub-template name cannot be located and is not cached.
    #[error("{helper}: cannot resolve template '{name}': {reason}")]
    Resolution {
        helper: &'static str,
        name: String,
        reason: String,
    },

    /// A sub-template rendered, but its output is not JSON.
    #[error("{helper}: output of template '{name}' is not valid JSON: {source}")]
    Parse {
        helper: &'static str,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The template engine rejected a sub-template's source.
    #[error("{helper}: failed to compile template '{name}': {message}")]
    Compile {
        helper: &'static str,
        name: String,
        message: String,
    },

    /// The template engine failed while rendering a sub-template.
    #[error("{helper}: failed to render template '{name}': {message}")]
    Render {
        helper: &'static str,
        name: String,
        message: String,
    },

    /// No helper is registered under this name.
    #[error("unknown helper '{name}'{}", format_suggestions(suggestions))]
    UnknownHelper {
        name: String,
        suggestions: Vec<String>,
    },
}

impl HelperError {
    pub fn invalid_input(helper: &'static str, message: impl Into<String>) -> Self {
        HelperError::InvalidInput {
            helper,
            message: message.into(),
        }
    }

    /// The helper this error was raised by, if any.
    pub fn helper(&self) -> Option<&'static str> {
        match self {
            HelperError::InvalidInput { helper, .. }
            | HelperError::Resolution { helper, .. }
            | HelperError::Parse { helper, .. }
            | HelperError::Compile { helper, .. }
            | HelperError::Render { helper, .. } => Some(*helper),
            HelperError::UnknownHelper { .. } => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Returns up to three names close to `name`, closest first.
///
/// Names of three characters or fewer allow one edit, longer names two.
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
