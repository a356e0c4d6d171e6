//! Miette diagnostic wrapper for message parse errors.

use std::path::Path;

use hl7tmpl::ParseError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for message parse errors.
#[derive(Debug, Error, Diagnostic)]
#[error("parse error: {message}")]
#[diagnostic(code(hl7tmpl::parse))]
pub struct MessageDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl MessageDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (offset, message, help) = match err {
            ParseError::Syntax {
                offset, message, ..
            } => (*offset, message.clone(), None),
            ParseError::UnexpectedEof { .. } => (
                content.len(),
                "unexpected end of input".to_string(),
                Some(
                    "the MSH segment must declare a field separator and encoding characters"
                        .to_string(),
                ),
            ),
            ParseError::InvalidUtf8 => (0, "invalid UTF-8".to_string(), None),
            ParseError::Tree(e) => (0, e.to_string(), None),
        };

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        MessageDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message,
            help,
        }
    }
}
