//! Maps records onto the bit stream, one declared field at a time.

use std::any::type_name;
use std::fmt;

use bitstream::{BitError, BitReader, BitWriter, TextEncoding};
use log::{debug, trace};

use crate::descriptor::{BitFields, FieldDef, Layout, ReadFn, Shape, WriteFn};
use crate::error::{FieldError, FieldResult};
use crate::value::{FieldType, FieldValue};

/// Largest zero gap a single layout may ask for.
const MAX_GAP_BITS: usize = 1 << 16;

/// How one field is put on the wire once its annotations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Bool,
    Int { bits: u8, signed: bool },
    F32,
    F64,
    Text(TextEncoding),
    Bytes { bits: usize },
}

impl Encoding {
    /// Bits the field occupies, or `None` when only known at runtime.
    const fn fixed_bits(self) -> Option<usize> {
        match self {
            Self::Bool => Some(1),
            Self::Int { bits, signed } => Some(bits as usize + signed as usize),
            Self::F32 => Some(32),
            Self::F64 => Some(64),
            Self::Text(_) => None,
            Self::Bytes { bits } => Some(bits),
        }
    }
}

/// A field with its annotations resolved to zero padding plus an encoding.
struct Slot<T> {
    def: FieldDef<T>,
    pad: usize,
    encoding: Encoding,
}

enum Plan<T> {
    Custom { write: WriteFn<T>, read: ReadFn<T> },
    Fields(Vec<Slot<T>>),
}

/// Reads and writes values of a [`BitFields`] type.
///
/// All annotation checks happen in [`new`](Self::new). After that, the
/// only errors are those of the underlying reader and writer: invalid
/// widths for byte fields, text that does not fit its encoding, and
/// running out of input.
///
/// A serializer holds no per-call state and can be shared between threads.
pub struct FieldSerializer<T> {
    type_name: &'static str,
    plan: Plan<T>,
    fixed_bits: Option<usize>,
}

impl<T: BitFields> FieldSerializer<T> {
    /// Builds a serializer for `T`, validating its field annotations.
    pub fn new() -> FieldResult<Self> {
        let type_name = type_name::<T>();
        match T::shape() {
            Shape::Custom { write, read } => {
                debug!("{type_name} serializes itself");
                Ok(Self {
                    type_name,
                    plan: Plan::Custom { write, read },
                    fixed_bits: None,
                })
            }
            Shape::Fields(defs) => {
                let slots = build_plan(type_name, defs)?;
                let fixed_bits = slots.iter().try_fold(0usize, |total, slot| {
                    Some(total + slot.pad + slot.encoding.fixed_bits()?)
                });
                debug!(
                    "{type_name} maps {} fields ({})",
                    slots.len(),
                    fixed_bits.map_or_else(|| "variable width".to_string(), |bits| format!("{bits} bits"))
                );
                Ok(Self {
                    type_name,
                    plan: Plan::Fields(slots),
                    fixed_bits,
                })
            }
        }
    }

    /// Name of the mapped type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Encoded size in bits when every mapped field has a fixed width.
    #[must_use]
    pub const fn fixed_bits(&self) -> Option<usize> {
        self.fixed_bits
    }

    /// Names of the mapped fields, in wire order. Empty for types that
    /// serialize themselves.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        match &self.plan {
            Plan::Custom { .. } => Vec::new(),
            Plan::Fields(slots) => slots.iter().map(|slot| slot.def.name()).collect(),
        }
    }

    /// Writes `value` field by field.
    pub fn serialize(&self, writer: &mut BitWriter, value: &T) -> FieldResult<()> {
        let slots = match &self.plan {
            Plan::Custom { write, .. } => return write(value, writer),
            Plan::Fields(slots) => slots,
        };
        for slot in slots {
            writer.pad(slot.pad);
            let field_value = slot.def.get(value);
            trace!(
                "write {}.{} = {field_value:?}",
                self.type_name,
                slot.def.name()
            );
            write_slot(writer, slot, field_value)?;
        }
        Ok(())
    }

    /// Reads a value field by field, starting from `T::default()`.
    ///
    /// Excluded fields keep their default. Running out of input is
    /// [`BitError::EndOfBuffer`]; the reader is left wherever the failing
    /// field started.
    pub fn deserialize(&self, reader: &mut BitReader<'_>) -> FieldResult<T> {
        let mut record = T::default();
        let slots = match &self.plan {
            Plan::Custom { read, .. } => {
                read(&mut record, reader)?;
                return Ok(record);
            }
            Plan::Fields(slots) => slots,
        };
        for slot in slots {
            reader.skip(slot.pad)?;
            let field_value = read_slot(reader, slot)?;
            trace!(
                "read {}.{} = {field_value:?}",
                self.type_name,
                slot.def.name()
            );
            let ty = field_value.ty();
            if !slot.def.set(&mut record, field_value) {
                return Err(FieldError::Incompatible {
                    field: slot.def.name(),
                    ty,
                });
            }
        }
        Ok(record)
    }

    /// Reads a value, or returns `Ok(None)` without moving the reader if
    /// the input ends first.
    pub fn try_deserialize(&self, reader: &mut BitReader<'_>) -> FieldResult<Option<T>> {
        let mut probe = reader.clone();
        match self.deserialize(&mut probe) {
            Ok(record) => {
                *reader = probe;
                Ok(Some(record))
            }
            Err(FieldError::Bit(BitError::EndOfBuffer { .. })) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Writes `value` into a fresh buffer.
    pub fn to_bytes(&self, value: &T) -> FieldResult<Vec<u8>> {
        let mut writer = BitWriter::new();
        self.serialize(&mut writer, value)?;
        Ok(writer.finish())
    }

    /// Reads a value from the start of `bytes`.
    pub fn from_bytes(&self, bytes: &[u8]) -> FieldResult<T> {
        let mut reader = BitReader::new(bytes)?;
        self.deserialize(&mut reader)
    }
}

impl<T> fmt::Debug for FieldSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("FieldSerializer");
        out.field("type_name", &self.type_name);
        match &self.plan {
            Plan::Custom { .. } => out.field("plan", &"custom"),
            Plan::Fields(slots) => out.field(
                "fields",
                &slots.iter().map(|slot| slot.def.name()).collect::<Vec<_>>(),
            ),
        };
        out.finish()
    }
}

/// Resolves every field's annotations, in declaration order.
fn build_plan<T>(type_name: &'static str, defs: Vec<FieldDef<T>>) -> FieldResult<Vec<Slot<T>>> {
    let mut slots = Vec::with_capacity(defs.len());
    // Bit offset from the start of the record, while it is still known.
    let mut position = Some(0usize);

    for def in defs {
        let field = def.name();
        if def.layouts().len() > 1 {
            return Err(FieldError::ConflictingLayout { field });
        }
        if def.is_excluded() {
            trace!("{type_name}.{field} excluded");
            continue;
        }

        let ty = def.ty();
        if def.is_signed() && !ty.is_signed_int() {
            return Err(FieldError::SignedUnsigned { field, ty });
        }
        if def.text_encoding().is_some() && ty != FieldType::Text {
            return Err(FieldError::UnsupportedLayout { field, ty });
        }

        let layout = def.layouts().first().copied();
        let (pad, encoding) = match ty {
            FieldType::Text | FieldType::F32 | FieldType::F64 => {
                if layout.is_some() {
                    return Err(FieldError::UnsupportedLayout { field, ty });
                }
                let encoding = match ty {
                    FieldType::F32 => Encoding::F32,
                    FieldType::F64 => Encoding::F64,
                    _ => Encoding::Text(def.text_encoding().unwrap_or_default()),
                };
                (0, encoding)
            }
            FieldType::Bool => {
                let (pad, width) = resolve_layout(field, layout, position, false)?;
                check_width(field, width.unwrap_or(1), 1)?;
                (pad, Encoding::Bool)
            }
            FieldType::Bytes => {
                let (pad, width) = resolve_layout(field, layout, position, false)?;
                let width = width.ok_or(FieldError::MissingWidth { field })?;
                check_width(field, width, u32::MAX)?;
                (pad, Encoding::Bytes { bits: width as usize })
            }
            _ => {
                let signed = def.is_signed();
                let type_bits = ty.int_bits().unwrap_or(64);
                let max_bits = u32::from(type_bits) - u32::from(signed);
                let (pad, width) = resolve_layout(field, layout, position, signed)?;
                let width = width.unwrap_or(max_bits);
                check_width(field, width, max_bits)?;
                (
                    pad,
                    Encoding::Int {
                        bits: width as u8,
                        signed,
                    },
                )
            }
        };

        position = position
            .zip(encoding.fixed_bits())
            .map(|(position, bits)| position + pad + bits);
        slots.push(Slot { def, pad, encoding });
    }

    if slots.is_empty() {
        return Err(FieldError::NoFields { type_name });
    }
    Ok(slots)
}

/// Turns a layout into `(zero padding, width)`. The width is `None` when
/// the field has no layout and falls back to its type's default.
fn resolve_layout(
    field: &'static str,
    layout: Option<Layout>,
    position: Option<usize>,
    signed: bool,
) -> FieldResult<(usize, Option<u32>)> {
    match layout {
        None => Ok((0, None)),
        Some(Layout::Size { bits }) => Ok((0, Some(u32::from(bits)))),
        Some(Layout::Relative { offset, bits }) => {
            Ok((check_gap(field, offset as usize)?, Some(u32::from(bits))))
        }
        Some(Layout::Range { start, end }) => {
            let position = position.ok_or(FieldError::RangeAfterVariable { field })?;
            if (start as usize) < position {
                return Err(FieldError::Overlap {
                    field,
                    start,
                    position,
                });
            }
            let span = end.saturating_sub(start);
            let width = if signed { span.saturating_sub(1) } else { span };
            Ok((check_gap(field, start as usize - position)?, Some(width)))
        }
    }
}

fn check_gap(field: &'static str, bits: usize) -> FieldResult<usize> {
    if bits > MAX_GAP_BITS {
        return Err(FieldError::GapTooLarge {
            field,
            bits,
            max_bits: MAX_GAP_BITS,
        });
    }
    Ok(bits)
}

fn check_width(field: &'static str, bits: u32, max_bits: u32) -> FieldResult<()> {
    if bits == 0 || bits > max_bits {
        return Err(FieldError::InvalidWidth {
            field,
            bits,
            max_bits,
        });
    }
    Ok(())
}

fn write_slot<T>(writer: &mut BitWriter, slot: &Slot<T>, value: FieldValue) -> FieldResult<()> {
    match (slot.encoding, value) {
        (Encoding::Bool, FieldValue::Bool(v)) => writer.write_bool(v),
        (Encoding::Int { bits, signed: false }, value) => match value {
            FieldValue::U8(v) => writer.write(bits, v)?,
            FieldValue::U16(v) => writer.write(bits, v)?,
            FieldValue::U32(v) => writer.write(bits, v)?,
            FieldValue::U64(v) => writer.write(bits, v)?,
            FieldValue::I8(v) => writer.write(bits, v)?,
            FieldValue::I16(v) => writer.write(bits, v)?,
            FieldValue::I32(v) => writer.write(bits, v)?,
            FieldValue::I64(v) => writer.write(bits, v)?,
            other => return Err(incompatible(slot, &other)),
        },
        (Encoding::Int { bits, signed: true }, value) => match value {
            FieldValue::I8(v) => writer.write_signed(bits, v)?,
            FieldValue::I16(v) => writer.write_signed(bits, v)?,
            FieldValue::I32(v) => writer.write_signed(bits, v)?,
            FieldValue::I64(v) => writer.write_signed(bits, v)?,
            other => return Err(incompatible(slot, &other)),
        },
        (Encoding::F32, FieldValue::F32(v)) => writer.write_f32(v),
        (Encoding::F64, FieldValue::F64(v)) => writer.write_f64(v),
        (Encoding::Text(encoding), FieldValue::Text(v)) => writer.write_text(&v, encoding)?,
        (Encoding::Bytes { bits }, FieldValue::Bytes(v)) => writer.write_bytes(bits, &v)?,
        (_, other) => return Err(incompatible(slot, &other)),
    }
    Ok(())
}

/// The `Incompatible` arms here and in `write_slot` cannot fire for
/// fields from `FieldDef::new`, whose type and values share `F::TYPE`.
fn read_slot<T>(reader: &mut BitReader<'_>, slot: &Slot<T>) -> FieldResult<FieldValue> {
    let value = match slot.encoding {
        Encoding::Bool => FieldValue::Bool(reader.read_bool()?),
        Encoding::Int { bits, signed: false } => match slot.def.ty() {
            FieldType::U8 => FieldValue::U8(reader.read(bits)?),
            FieldType::U16 => FieldValue::U16(reader.read(bits)?),
            FieldType::U32 => FieldValue::U32(reader.read(bits)?),
            FieldType::U64 => FieldValue::U64(reader.read(bits)?),
            FieldType::I8 => FieldValue::I8(reader.read(bits)?),
            FieldType::I16 => FieldValue::I16(reader.read(bits)?),
            FieldType::I32 => FieldValue::I32(reader.read(bits)?),
            FieldType::I64 => FieldValue::I64(reader.read(bits)?),
            ty => return Err(FieldError::Incompatible { field: slot.def.name(), ty }),
        },
        Encoding::Int { bits, signed: true } => match slot.def.ty() {
            FieldType::I8 => FieldValue::I8(reader.read_signed(bits)?),
            FieldType::I16 => FieldValue::I16(reader.read_signed(bits)?),
            FieldType::I32 => FieldValue::I32(reader.read_signed(bits)?),
            FieldType::I64 => FieldValue::I64(reader.read_signed(bits)?),
            ty => return Err(FieldError::Incompatible { field: slot.def.name(), ty }),
        },
        Encoding::F32 => FieldValue::F32(reader.read_f32()?),
        Encoding::F64 => FieldValue::F64(reader.read_f64()?),
        Encoding::Text(encoding) => FieldValue::Text(reader.read_text(encoding)?),
        Encoding::Bytes { bits } => FieldValue::Bytes(reader.read_bytes(bits)?),
    };
    Ok(value)
}

fn incompatible<T>(slot: &Slot<T>, value: &FieldValue) -> FieldError {
    FieldError::Incompatible {
        field: slot.def.name(),
        ty: value.ty(),
    }
}
