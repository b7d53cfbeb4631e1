//! Field mapping errors.

use std::fmt;

use bitstream::BitError;

use crate::value::FieldType;

/// Result type for field mapping operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised while building or running a [`FieldSerializer`](crate::FieldSerializer).
///
/// Everything except `Incompatible` and `Bit` is reported once, when the
/// serializer is built. `Incompatible` is unreachable for fields declared
/// through `FieldDef::new`, so a serializer that built successfully only
/// fails later with stream errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    /// The type declares no fields that take part in serialization.
    NoFields { type_name: &'static str },

    /// A field carries more than one layout annotation.
    ConflictingLayout { field: &'static str },

    /// A field's bit width is zero or too wide for its type.
    InvalidWidth {
        field: &'static str,
        bits: u32,
        max_bits: u32,
    },

    /// A layout or encoding annotation was placed on a type that has a fixed
    /// encoding of its own.
    UnsupportedLayout { field: &'static str, ty: FieldType },

    /// A byte-range field has no width annotation.
    MissingWidth { field: &'static str },

    /// A sign-magnitude annotation was placed on a type without a sign.
    SignedUnsigned { field: &'static str, ty: FieldType },

    /// An absolute range starts before the end of the previous field.
    Overlap {
        field: &'static str,
        start: u32,
        position: usize,
    },

    /// A layout asks for more zero padding before a field than allowed.
    GapTooLarge {
        field: &'static str,
        bits: usize,
        max_bits: usize,
    },

    /// An absolute range follows a field whose width is only known at
    /// runtime.
    RangeAfterVariable { field: &'static str },

    /// A field accessor produced or rejected a value of the wrong type.
    ///
    /// Fields built with [`FieldDef::new`](crate::FieldDef::new) never hit
    /// this: the declared type and the value variant both come from the
    /// same [`FieldPrimitive::TYPE`](crate::FieldPrimitive::TYPE).
    Incompatible { field: &'static str, ty: FieldType },

    /// Underlying bitstream error.
    Bit(BitError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFields { type_name } => {
                write!(f, "type {type_name} has no serializable fields")
            }
            Self::ConflictingLayout { field } => {
                write!(f, "field `{field}` has more than one layout annotation")
            }
            Self::InvalidWidth {
                field,
                bits,
                max_bits,
            } => {
                write!(
                    f,
                    "field `{field}` has invalid width {bits}, expected 1 to {max_bits} bits"
                )
            }
            Self::UnsupportedLayout { field, ty } => {
                write!(f, "field `{field}` of type {ty} cannot take this annotation")
            }
            Self::MissingWidth { field } => {
                write!(f, "field `{field}` needs a bit width")
            }
            Self::SignedUnsigned { field, ty } => {
                write!(f, "field `{field}` of type {ty} cannot be signed")
            }
            Self::Overlap {
                field,
                start,
                position,
            } => {
                write!(
                    f,
                    "field `{field}` starts at bit {start} but the previous field ends at bit {position}"
                )
            }
            Self::GapTooLarge {
                field,
                bits,
                max_bits,
            } => {
                write!(
                    f,
                    "field `{field}` is preceded by a {bits}-bit gap, at most {max_bits} bits allowed"
                )
            }
            Self::RangeAfterVariable { field } => {
                write!(
                    f,
                    "field `{field}` uses an absolute range after a variable-width field"
                )
            }
            Self::Incompatible { field, ty } => {
                write!(f, "field `{field}` has no {ty} encoding")
            }
            Self::Bit(err) => write!(f, "bitstream error: {err}"),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BitError> for FieldError {
    fn from(err: BitError) -> Self {
        Self::Bit(err)
    }
}
