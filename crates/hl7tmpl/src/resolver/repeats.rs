use crate::error::HelperError;
use crate::types::{Field, Repeat};

pub(crate) const GET_FIELD_REPEATS: &str = "getFieldRepeats";

/// The repeats of a field.
///
/// An absent field is `Ok(None)`, which is different from a present field
/// with zero repeats (`Ok(Some(&[]))`). A scalar field was never decomposed
/// by the parser and is rejected.
pub fn field_repeats(field: Option<&Field>) -> Result<Option<&[Repeat]>, HelperError> {
    match field {
        None => Ok(None),
        Some(Field::Repeats(repeats)) => Ok(Some(repeats)),
        Some(Field::Scalar(value)) => Err(HelperError::invalid_input(
            GET_FIELD_REPEATS,
            format!("field value '{value}' was not split into repeats by the message parser"),
        )),
    }
}
