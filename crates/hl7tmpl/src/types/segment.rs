use std::fmt::{Display, Formatter, Result as FmtResult};

use bon::Builder;
use serde::{Deserialize, Serialize};

/// One named segment of a parsed message.
///
/// `fields[0]` holds HL7 field 1, so `MSH-9` lives at `fields[8]`. For `MSH`
/// the field separator itself is field 1 and the encoding characters field 2.
///
/// # Example
///
/// ```
/// use hl7tmpl::{Field, Segment};
///
/// let obr = Segment::builder()
///     .name("OBR")
///     .position(4)
///     .fields(vec![Field::from("2"), Field::from("ORD-17")])
///     .build();
///
/// assert_eq!(obr.set_id(), Some("2"));
/// assert_eq!(obr.field(2).and_then(Field::first_value), Some("ORD-17"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct Segment {
    /// Segment type code, e.g. `PID` or `OBX`.
    #[builder(into)]
    pub name: String,

    /// 0-based index of the segment in the message.
    pub position: usize,

    #[builder(default)]
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Segment {
    /// Returns a field by its 1-based HL7 number.
    pub fn field(&self, number: usize) -> Option<&Field> {
        number.checked_sub(1).and_then(|index| self.fields.get(index))
    }

    /// The set ID (field 1) used to tell repeated instances apart.
    pub fn set_id(&self) -> Option<&str> {
        self.field(1).and_then(Field::first_value)
    }
}

/// A field value as produced by the message parser.
///
/// Parsed fields are always [`Field::Repeats`]; an empty field is present
/// with zero repeats. [`Field::Scalar`] is an opaque value that was never split
/// (the parser only emits it for `MSH-1` and `MSH-2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Repeats(Vec<Repeat>),
    Scalar(String),
}

impl Field {
    /// The repeats of a decomposed field, or `None` for a scalar.
    pub fn repeats(&self) -> Option<&[Repeat]> {
        match self {
            Field::Repeats(repeats) => Some(repeats),
            Field::Scalar(_) => None,
        }
    }

    /// First component of the first repeat, or the scalar text.
    pub fn first_value(&self) -> Option<&str> {
        match self {
            Field::Repeats(repeats) => repeats.first().and_then(|r| r.component(1)),
            Field::Scalar(s) => Some(s),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Field::Repeats(repeats) => repeats.is_empty(),
            Field::Scalar(s) => s.is_empty(),
        }
    }
}

impl From<&str> for Field {
    /// A field with a single repeat holding a single component.
    fn from(value: &str) -> Self {
        Field::Repeats(vec![Repeat::from(value)])
    }
}

impl From<Vec<Repeat>> for Field {
    fn from(repeats: Vec<Repeat>) -> Self {
        Field::Repeats(repeats)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Field::Scalar(s) => write!(f, "{s}"),
            Field::Repeats(repeats) => {
                for (i, repeat) in repeats.iter().enumerate() {
                    if i > 0 {
                        write!(f, "~")?;
                    }
                    write!(f, "{repeat}")?;
                }
                Ok(())
            }
        }
    }
}

/// One occurrence of a repeating field, split into components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repeat(Vec<String>);

impl Repeat {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Returns a component by its 1-based number.
    pub fn component(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .map(String::as_str)
    }
}

impl From<&str> for Repeat {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for Repeat {
    fn from(components: [&str; N]) -> Self {
        Self(components.iter().map(|c| (*c).to_string()).collect())
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.join("^"))
    }
}
