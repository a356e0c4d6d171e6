//! ER7 message parser using winnow.
//!
//! winnow handles the line structure (MSH header, segment names, line
//! breaks); field bodies are then split on the delimiters declared by the
//! header.

use std::str::from_utf8;

use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

use super::error::ParseError;
use crate::types::{Field, MessageTree, Repeat, Segment};

/// The delimiter set declared by `MSH-1` and `MSH-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub field: char,
    pub component: char,
    pub repetition: char,
    pub escape: char,
    pub subcomponent: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl Delimiters {
    fn from_header(field: char, encoding: &str) -> Option<Self> {
        let mut chars = encoding.chars();
        Some(Self {
            field,
            component: chars.next()?,
            repetition: chars.next()?,
            escape: chars.next()?,
            subcomponent: chars.next()?,
        })
    }
}

/// Parse a message into its segment tree.
///
/// # Example
///
/// ```
/// use hl7tmpl::parser::parse_message;
///
/// let tree = parse_message("MSH|^~\\&|LAB\rPID|1||12345^^^MRN~999^^^SSN\r").unwrap();
/// assert_eq!(tree.len(), 2);
///
/// let pid = tree.first("PID").unwrap();
/// assert_eq!(pid.position, 1);
/// assert_eq!(pid.field(3).and_then(|f| f.repeats()).map(|r| r.len()), Some(2));
/// ```
pub fn parse_message(input: &str) -> Result<MessageTree, ParseError> {
    let mut remaining = input.trim_start();

    if !remaining.starts_with("MSH") {
        return Err(syntax_error(
            input,
            remaining,
            "message must start with an MSH segment",
        ));
    }

    let header_start = remaining;
    let (field_sep, encoding, rest) = match msh_header(&mut remaining) {
        Ok(header) => header,
        Err(_) => {
            let first_line = header_start
                .split(['\r', '\n'])
                .next()
                .unwrap_or(header_start);
            if first_line.len() == header_start.len() && first_line.len() < 8 {
                let (line, column) = calculate_position(input, "");
                return Err(ParseError::UnexpectedEof { line, column });
            }
            return Err(syntax_error(
                input,
                header_start,
                "invalid MSH header: expected a field separator and four encoding characters",
            ));
        }
    };

    let delimiters = Delimiters::from_header(field_sep, encoding).ok_or_else(|| {
        syntax_error(input, header_start, "MSH-2 must declare four encoding characters")
    })?;

    let mut msh_fields = vec![
        Field::Scalar(field_sep.to_string()),
        Field::Scalar(encoding.to_string()),
    ];
    msh_fields.extend(split_fields(rest, &delimiters));
    let mut segments = vec![
        Segment::builder()
            .name("MSH")
            .position(0)
            .fields(msh_fields)
            .build(),
    ];

    loop {
        opt(line_breaks)
            .parse_next(&mut remaining)
            .map_err(|_| syntax_error(input, remaining, "expected a line break"))?;
        if remaining.trim().is_empty() {
            break;
        }

        let start = remaining;
        let (name, body) = segment_line
            .parse_next(&mut remaining)
            .map_err(|_| syntax_error(input, start, "expected a three-character segment name"))?;

        if !body.is_empty() && !body.starts_with(delimiters.field) {
            return Err(syntax_error(
                input,
                start,
                &format!(
                    "expected field separator '{}' after segment name '{name}'",
                    delimiters.field
                ),
            ));
        }

        let position = segments.len();
        segments.push(
            Segment::builder()
                .name(name)
                .position(position)
                .fields(split_fields(body, &delimiters))
                .build(),
        );
    }

    log::debug!("parsed message with {} segments", segments.len());
    Ok(MessageTree::new(segments)?)
}

/// Parse a message from raw bytes, rejecting invalid UTF-8.
pub fn parse_message_bytes(input: &[u8]) -> Result<MessageTree, ParseError> {
    let text = from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
    parse_message(text)
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Parse the MSH header: field separator, encoding characters, rest of line.
fn msh_header<'i>(input: &mut &'i str) -> ModalResult<(char, &'i str, &'i str)> {
    let field_sep = preceded(
        "MSH",
        any.verify(|c: &char| !is_line_break(*c) && !c.is_ascii_alphanumeric()),
    )
    .parse_next(input)?;
    let encoding =
        take_while(4..=5, |c: char| c != field_sep && !is_line_break(c)).parse_next(input)?;
    let rest = take_till(0.., ['\r', '\n']).parse_next(input)?;
    Ok((field_sep, encoding, rest))
}

/// Parse a segment name and the rest of its line.
fn segment_line<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    (segment_name, take_till(0.., ['\r', '\n'])).parse_next(input)
}

/// Parse a segment name: an uppercase letter followed by two uppercase letters or digits.
fn segment_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(3, |c: char| c.is_ascii_uppercase() || c.is_ascii_digit())
        .verify(|name: &str| name.starts_with(|c: char| c.is_ascii_uppercase()))
        .parse_next(input)
}

/// Parse one or more line breaks.
fn line_breaks<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., ['\r', '\n']).parse_next(input)
}

/// Split a segment body (starting with the field separator) into fields.
fn split_fields(body: &str, delimiters: &Delimiters) -> Vec<Field> {
    let Some(body) = body.strip_prefix(delimiters.field) else {
        return Vec::new();
    };
    body.split(delimiters.field)
        .map(|raw| split_field(raw, delimiters))
        .collect()
}

fn split_field(raw: &str, delimiters: &Delimiters) -> Field {
    if raw.is_empty() {
        return Field::Repeats(Vec::new());
    }
    let repeats = raw
        .split(delimiters.repetition)
        .map(|repeat| {
            Repeat::new(
                repeat
                    .split(delimiters.component)
                    .map(|component| unescape(component, delimiters))
                    .collect(),
            )
        })
        .collect();
    Field::Repeats(repeats)
}

/// Decode the delimiter escape sequences `\F\ \S\ \T\ \R\ \E\`.
///
/// Other escape sequences (formatting, hex) are kept verbatim.
fn unescape(component: &str, delimiters: &Delimiters) -> String {
    let escape = delimiters.escape;
    if !component.contains(escape) {
        return component.to_string();
    }

    let mut out = String::with_capacity(component.len());
    let mut rest = component;
    while let Some(start) = rest.find(escape) {
        out.push_str(&rest[..start]);
        let after = &rest[start + escape.len_utf8()..];
        let Some(end) = after.find(escape) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let decoded = match &after[..end] {
            "F" => Some(delimiters.field),
            "S" => Some(delimiters.component),
            "T" => Some(delimiters.subcomponent),
            "R" => Some(delimiters.repetition),
            "E" => Some(delimiters.escape),
            _ => None,
        };
        let sequence_len = escape.len_utf8() * 2 + end;
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&rest[start..start + sequence_len]),
        }
        rest = &rest[start + sequence_len..];
    }
    out.push_str(rest);
    out
}

fn syntax_error(original: &str, remaining: &str, message: &str) -> ParseError {
    let (line, column) = calculate_position(original, remaining);
    ParseError::Syntax {
        line,
        column,
        offset: original.len() - remaining.len(),
        message: message.to_string(),
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = &original[..original.len() - remaining.len()];
    let mut line = 1;
    let mut column = 1;
    let mut after_cr = false;
    for c in consumed.chars() {
        match c {
            '\n' if after_cr => {}
            '\r' | '\n' => {
                line += 1;
                column = 1;
            }
            _ => column += 1,
        }
        after_cr = c == '\r';
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_decodes_delimiters() {
        let d = Delimiters::default();
        assert_eq!(unescape(r"a\F\b\S\c\E\", &d), r"a|b^c\");
        assert_eq!(unescape(r"\T\\R\", &d), "&~");
    }

    #[test]
    fn unescape_keeps_unknown_sequences() {
        let d = Delimiters::default();
        assert_eq!(unescape(r"\H\bold\N\", &d), r"\H\bold\N\");
        assert_eq!(unescape(r"dangling\F", &d), r"dangling\F");
    }

    #[test]
    fn position_counts_cr_and_crlf_once() {
        let text = "MSH\r\nPID\rOBX";
        let (line, column) = calculate_position(text, &text[9..]);
        assert_eq!((line, column), (3, 1));
    }
}
