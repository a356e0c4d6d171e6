//! Parse error types for ER7 messages.

use thiserror::Error;

use crate::error::TreeError;

/// An error that occurred while parsing a message.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    ///
    /// `offset` is the byte offset into the input; `line` and `column` are
    /// 1-based and count `\r`, `\n` and `\r\n` as one line break each.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        offset: usize,
        message: String,
    },

    /// Input ended inside the MSH header.
    #[error("unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: usize, column: usize },

    /// Invalid UTF-8 in input.
    #[error("invalid UTF-8 in input")]
    InvalidUtf8,

    /// The parsed segments do not form a valid tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
