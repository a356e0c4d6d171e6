//! ER7 message parser.
//!
//! Turns pipe-delimited HL7 v2 text into a [`MessageTree`](crate::MessageTree).
//! Every field except `MSH-1` and `MSH-2` is decomposed into repeats and
//! components; escape sequences in components are decoded.

pub mod error;
mod message;

pub use error::ParseError;
pub use message::{Delimiters, parse_message, parse_message_bytes};
