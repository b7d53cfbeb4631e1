//! Record descriptors: the ordered field list a serializer walks.

use std::fmt;
use std::ops::Range;

use bitstream::{BitReader, BitWriter, TextEncoding};

use crate::error::FieldResult;
use crate::value::{FieldPrimitive, FieldType, FieldValue};

/// Where a field sits in the bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Layout {
    /// Packed right after the previous field. `bits` is the value width,
    /// not counting the sign bit of a signed field.
    Size { bits: u8 },

    /// Occupies `[start, end)` counted from the first bit of the record. The
    /// gap after the previous field is zero-filled. For a signed field the
    /// span includes the sign bit.
    Range { start: u32, end: u32 },

    /// Skips `offset` bits after the previous field, then behaves like
    /// `Size { bits }`.
    Relative { offset: u32, bits: u8 },
}

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> bool + Send + Sync>;

/// One declared field of a record type.
///
/// Built with [`FieldDef::new`] and the annotation methods, usually by
/// `#[derive(BitFields)]`.
pub struct FieldDef<T> {
    name: &'static str,
    ty: FieldType,
    layouts: Vec<Layout>,
    signed: bool,
    excluded: bool,
    encoding: Option<TextEncoding>,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T: 'static> FieldDef<T> {
    /// Declares a field from a pair of accessors.
    pub fn new<F: FieldPrimitive>(
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            name,
            ty: F::TYPE,
            layouts: Vec::new(),
            signed: false,
            excluded: false,
            encoding: None,
            get: Box::new(move |record: &T| get(record).to_value()),
            set: Box::new(move |record: &mut T, value: FieldValue| match F::from_value(value) {
                Some(value) => {
                    *get_mut(record) = value;
                    true
                }
                None => false,
            }),
        }
    }

    /// Packs the field into `bits` bits.
    #[must_use]
    pub fn bits(mut self, bits: u8) -> Self {
        self.layouts.push(Layout::Size { bits });
        self
    }

    /// Places the field at an absolute bit range within the record.
    #[must_use]
    pub fn range(mut self, range: Range<u32>) -> Self {
        self.layouts.push(Layout::Range {
            start: range.start,
            end: range.end,
        });
        self
    }

    /// Skips `offset` bits, then packs the field into `bits` bits.
    #[must_use]
    pub fn relative(mut self, offset: u32, bits: u8) -> Self {
        self.layouts.push(Layout::Relative { offset, bits });
        self
    }

    /// Writes the field as a sign bit plus magnitude.
    #[must_use]
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Leaves the field out of the stream. It reads back as its default.
    #[must_use]
    pub const fn skip(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Sets the text encoding of a text field.
    #[must_use]
    pub const fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }
}

impl<T> FieldDef<T> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.excluded
    }

    #[must_use]
    pub const fn text_encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    pub(crate) fn get(&self, record: &T) -> FieldValue {
        (self.get)(record)
    }

    pub(crate) fn set(&self, record: &mut T, value: FieldValue) -> bool {
        (self.set)(record, value)
    }
}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("layouts", &self.layouts)
            .field("signed", &self.signed)
            .field("excluded", &self.excluded)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

/// Writes a record with its own code.
pub type WriteFn<T> = fn(&T, &mut BitWriter) -> FieldResult<()>;

/// Reads a record with its own code, filling in a default instance.
pub type ReadFn<T> = fn(&mut T, &mut BitReader<'_>) -> FieldResult<()>;

/// How a record type maps onto the bit stream.
pub enum Shape<T> {
    /// The type serializes itself.
    Custom { write: WriteFn<T>, read: ReadFn<T> },

    /// The type is a list of fields, in serialization order.
    Fields(Vec<FieldDef<T>>),
}

impl<T: BitSerialize> Shape<T> {
    /// A shape that defers to the type's [`BitSerialize`] impl.
    #[must_use]
    pub fn custom() -> Self {
        Self::Custom {
            write: T::serialize,
            read: T::deserialize,
        }
    }
}

impl<T> fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { .. } => f.write_str("Custom"),
            Self::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
        }
    }
}

/// A record type the [`FieldSerializer`](crate::FieldSerializer) can map.
///
/// Usually derived. The derive lists the struct's named fields in
/// declaration order; that order is the wire order, since the stream
/// carries no tags.
///
/// ```
/// use fields::{BitFields, FieldSerializer};
///
/// #[derive(BitFields, Default, Debug, PartialEq)]
/// struct Sample {
///     #[bits(6)]
///     count: u32,
///     #[bits(6, signed)]
///     delta: i32,
///     ready: bool,
/// }
///
/// let serializer = FieldSerializer::<Sample>::new().unwrap();
/// let value = Sample { count: 24, delta: -23, ready: true };
/// let bytes = serializer.to_bytes(&value).unwrap();
/// assert_eq!(bytes.len(), 2);
/// assert_eq!(serializer.from_bytes(&bytes).unwrap(), value);
/// ```
pub trait BitFields: Default + 'static {
    /// Describes the record.
    fn shape() -> Shape<Self>;
}

/// A type that reads and writes itself.
///
/// Pair with `#[bit_fields(custom)]` on the derive, or return
/// [`Shape::custom`] from a manual [`BitFields`] impl.
pub trait BitSerialize {
    fn serialize(&self, writer: &mut BitWriter) -> FieldResult<()>;

    fn deserialize(&mut self, reader: &mut BitReader<'_>) -> FieldResult<()>;
}
