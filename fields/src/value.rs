//! Field types and dynamically typed field values.

use std::fmt;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// `bool`, one bit.
    Bool,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `i8`, raw bits or sign-magnitude.
    I8,
    /// `i16`, raw bits or sign-magnitude.
    I16,
    /// `i32`, raw bits or sign-magnitude.
    I32,
    /// `i64`, raw bits or sign-magnitude.
    I64,
    /// `f32`, always 32 bits.
    F32,
    /// `f64`, always 64 bits.
    F64,
    /// Length-prefixed text.
    Text,
    /// Raw bytes read and written as a bit range.
    Bytes,
}

impl FieldType {
    /// Width in bits of an integer type.
    #[must_use]
    pub const fn int_bits(self) -> Option<u8> {
        match self {
            Self::U8 | Self::I8 => Some(8),
            Self::U16 | Self::I16 => Some(16),
            Self::U32 | Self::I32 => Some(32),
            Self::U64 | Self::I64 => Some(64),
            _ => None,
        }
    }

    /// Returns `true` for `i8`..`i64`.
    #[must_use]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Rust spelling of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Text => "String",
            Self::Bytes => "Vec<u8>",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field value moving between a record and the bit stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A `bool` field.
    Bool(bool),
    /// A `u8` field.
    U8(u8),
    /// A `u16` field.
    U16(u16),
    /// A `u32` field.
    U32(u32),
    /// A `u64` field.
    U64(u64),
    /// An `i8` field.
    I8(i8),
    /// An `i16` field.
    I16(i16),
    /// An `i32` field.
    I32(i32),
    /// An `i64` field.
    I64(i64),
    /// An `f32` field.
    F32(f32),
    /// An `f64` field.
    F64(f64),
    /// A `String` field.
    Text(String),
    /// A `Vec<u8>` field, left-aligned bits.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The type this value carries.
    #[must_use]
    pub const fn ty(&self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Bool,
            Self::U8(_) => FieldType::U8,
            Self::U16(_) => FieldType::U16,
            Self::U32(_) => FieldType::U32,
            Self::U64(_) => FieldType::U64,
            Self::I8(_) => FieldType::I8,
            Self::I16(_) => FieldType::I16,
            Self::I32(_) => FieldType::I32,
            Self::I64(_) => FieldType::I64,
            Self::F32(_) => FieldType::F32,
            Self::F64(_) => FieldType::F64,
            Self::Text(_) => FieldType::Text,
            Self::Bytes(_) => FieldType::Bytes,
        }
    }
}

/// A Rust type that can be a mapped field.
///
/// Implemented for `bool`, the fixed-width integers, `f32`, `f64`, `String`
/// and `Vec<u8>`. Deriving [`BitFields`](crate::BitFields) on a struct with
/// any other field type fails to compile.
pub trait FieldPrimitive: Sized + 'static {
    /// The declared type.
    const TYPE: FieldType;

    /// Copies the value out of the record.
    fn to_value(&self) -> FieldValue;

    /// Unwraps a value of the matching variant.
    fn from_value(value: FieldValue) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl FieldPrimitive for $ty {
            const TYPE: FieldType = FieldType::$variant;

            fn to_value(&self) -> FieldValue {
                FieldValue::$variant(self.clone())
            }

            fn from_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    )*};
}

impl_primitive! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<u8> => Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widths() {
        assert_eq!(FieldType::U8.int_bits(), Some(8));
        assert_eq!(FieldType::I64.int_bits(), Some(64));
        assert_eq!(FieldType::F32.int_bits(), None);
        assert_eq!(FieldType::Text.int_bits(), None);
    }

    #[test]
    fn signedness() {
        assert!(FieldType::I16.is_signed_int());
        assert!(!FieldType::U16.is_signed_int());
        assert!(!FieldType::Bool.is_signed_int());
    }

    #[test]
    fn primitive_roundtrip_through_value() {
        let value = (-5i16).to_value();
        assert_eq!(value, FieldValue::I16(-5));
        assert_eq!(value.ty(), FieldType::I16);
        assert_eq!(i16::from_value(value), Some(-5));

        let text = String::from("abc").to_value();
        assert_eq!(String::from_value(text), Some("abc".to_string()));
    }

    #[test]
    fn from_value_rejects_other_variants() {
        assert_eq!(u8::from_value(FieldValue::U16(1)), None);
        assert_eq!(<Vec<u8>>::from_value(FieldValue::Text(String::new())), None);
    }

    #[test]
    fn display_uses_rust_names() {
        assert_eq!(FieldType::Bytes.to_string(), "Vec<u8>");
        assert_eq!(FieldType::I32.to_string(), "i32");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn field_type_serde_names() {
        assert_eq!(serde_json::to_string(&FieldType::I16).unwrap(), "\"i16\"");
        let back: FieldType = serde_json::from_str("\"bytes\"").unwrap();
        assert_eq!(back, FieldType::Bytes);
    }
}
