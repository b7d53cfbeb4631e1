//! Declarative mapping between record types and bit-packed streams.
//!
//! A record type lists its fields with [`BitFields`], usually through
//! `#[derive(BitFields)]`, and a [`FieldSerializer`] walks that list to
//! write or read the fields in declaration order with the
//! [`bitstream`] primitives.
//!
//! # Field annotations
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `#[bits(6)]` | pack into 6 bits |
//! | `#[bits(6, signed)]` | sign bit plus 6-bit magnitude |
//! | `#[bits(range = 8..14)]` | occupy bits 8 to 13 of the record |
//! | `#[bits(offset = 2, width = 4)]` | skip 2 bits, then pack into 4 |
//! | `#[bits(encoding = "ascii")]` | text encoding of a `String` field |
//! | `#[bits(skip)]` | leave the field out of the stream |
//!
//! Integers without a width use their full type width. `f32`, `f64` and
//! `String` fields have a fixed encoding and take no width. `Vec<u8>`
//! fields must have one.
//!
//! Annotation mistakes surface as a [`FieldError`] from
//! [`FieldSerializer::new`], never halfway through a stream.
//!
//! ```
//! use fields::{BitFields, FieldSerializer};
//!
//! #[derive(BitFields, Default, Debug, PartialEq)]
//! struct Status {
//!     #[bits(range = 0..3)]
//!     mode: u8,
//!     #[bits(range = 4..8)]
//!     load: u8,
//!     #[bits(encoding = "ascii")]
//!     label: String,
//! }
//!
//! let serializer = FieldSerializer::<Status>::new().unwrap();
//! let status = Status { mode: 5, load: 9, label: "up".into() };
//! let bytes = serializer.to_bytes(&status).unwrap();
//! assert_eq!(bytes, [0b1010_1001, 0, 0, 0, 2, b'u', b'p']);
//! assert_eq!(serializer.from_bytes(&bytes).unwrap(), status);
//! ```

extern crate self as fields;

mod descriptor;
mod error;
mod serializer;
mod value;

pub use descriptor::{BitFields, BitSerialize, FieldDef, Layout, ReadFn, Shape, WriteFn};
pub use error::{FieldError, FieldResult};
pub use fields_derive::BitFields;
pub use serializer::FieldSerializer;
pub use value::{FieldPrimitive, FieldType, FieldValue};

pub use bitstream::{BitError, BitReader, BitWriter, Limits, TextEncoding};
