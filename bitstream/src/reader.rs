//! Bit-level reader with bounded operations.

use crate::cursor::BitCursor;
use crate::error::{BitError, BitResult};
use crate::int::{PackedInt, SignedInt};
use crate::limits::Limits;
use crate::mask::widening_mask;
use crate::text::TextEncoding;
use crate::writer::check_bits;

/// A bit-level reader for decoding packed binary data.
///
/// Reads come in two flavours:
///
/// - `try_read_*` returns `Ok(None)` when fewer bits remain than requested
///   and leaves the cursor where it was.
/// - `read_*` turns that case into [`BitError::EndOfBuffer`].
///
/// Both return `Err` for invalid bit counts. Every read is bounds-checked
/// before the cursor moves, so the reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    cursor: BitCursor,
    limits: Limits,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::EmptyBuffer`] if `data` is empty.
    pub fn new(data: &'a [u8]) -> BitResult<Self> {
        Self::with_limits(data, Limits::default())
    }

    /// Creates a new `BitReader` enforcing the given limits.
    pub fn with_limits(data: &'a [u8], limits: Limits) -> BitResult<Self> {
        if data.is_empty() {
            return Err(BitError::EmptyBuffer);
        }
        Ok(Self {
            data,
            cursor: BitCursor::new(),
            limits,
        })
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn remaining_bits(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.cursor.position())
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the position of the next bit to be read.
    #[must_use]
    pub const fn cursor(&self) -> BitCursor {
        self.cursor
    }

    /// Returns the limits this reader enforces.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Reads up to 64 bits as an unsigned integer.
    pub fn try_read_bits(&mut self, bits: u8) -> BitResult<Option<u64>> {
        check_bits(bits, 64)?;
        Ok(self.has(usize::from(bits)).then(|| self.take(bits)))
    }

    /// Reads `bits` bits into an integer, with no sign bit.
    ///
    /// The bits are zero-extended, so reading fewer bits than `T` is wide
    /// into a signed type always yields a non-negative value.
    pub fn try_read<T: PackedInt>(&mut self, bits: u8) -> BitResult<Option<T>> {
        check_bits(bits, T::BITS)?;
        Ok(self
            .has(usize::from(bits))
            .then(|| T::from_raw(self.take(bits))))
    }

    /// Reads a sign bit followed by `bits` magnitude bits.
    ///
    /// A set sign bit with a zero magnitude reads as `0`.
    pub fn try_read_signed<T: SignedInt>(&mut self, bits: u8) -> BitResult<Option<T>> {
        check_bits(bits, T::BITS - 1)?;
        if !self.has(usize::from(bits) + 1) {
            return Ok(None);
        }
        let negative = self.take(1) == 1;
        let magnitude = self.take(bits);
        Ok(Some(T::from_sign_magnitude(negative, magnitude)))
    }

    /// Reads a single bit.
    pub fn try_read_bool(&mut self) -> Option<bool> {
        self.has(1).then(|| self.take(1) == 1)
    }

    /// Reads the 32 raw bits of an `f32`.
    pub fn try_read_f32(&mut self) -> Option<f32> {
        self.has(32).then(|| f32::from_bits(self.take(32) as u32))
    }

    /// Reads the 64 raw bits of an `f64`.
    pub fn try_read_f64(&mut self) -> Option<f64> {
        self.has(64).then(|| f64::from_bits(self.take(64)))
    }

    /// Reads a 32-bit byte count followed by that many bytes of text.
    ///
    /// If either part is missing the cursor is left at the length prefix.
    /// Bytes the encoding cannot represent are substituted, see
    /// [`TextEncoding::decode`].
    pub fn try_read_text(&mut self, encoding: TextEncoding) -> BitResult<Option<String>> {
        Ok(self.text(encoding)?.ok())
    }

    /// Reads UTF-8 text with a 32-bit length prefix.
    pub fn try_read_str(&mut self) -> BitResult<Option<String>> {
        self.try_read_text(TextEncoding::Utf8)
    }

    /// Reads `bits` bits into `ceil(bits / 8)` bytes.
    ///
    /// The bits are stored MSB-first from the start of the first byte, the
    /// same layout [`BitWriter::write_bytes`](crate::BitWriter::write_bytes)
    /// consumes. Unused trailing bits of the last byte are zero.
    pub fn try_read_bytes(&mut self, bits: usize) -> BitResult<Option<Vec<u8>>> {
        if bits == 0 {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: usize::MAX,
            });
        }
        if !self.has(bits) {
            return Ok(None);
        }

        let mut out = Vec::with_capacity(bits.div_ceil(8));
        for _ in 0..bits / 8 {
            out.push(self.take(8) as u8);
        }
        let rem = (bits % 8) as u8;
        if rem > 0 {
            out.push((self.take(rem) as u8) << (8 - rem));
        }
        Ok(Some(out))
    }

    /// Reads up to 64 bits as an unsigned integer.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        self.try_read_bits(bits)?
            .ok_or_else(|| self.end_of_buffer(usize::from(bits)))
    }

    /// Reads `bits` bits into an integer, with no sign bit.
    pub fn read<T: PackedInt>(&mut self, bits: u8) -> BitResult<T> {
        self.try_read(bits)?
            .ok_or_else(|| self.end_of_buffer(usize::from(bits)))
    }

    /// Reads a sign bit followed by `bits` magnitude bits.
    pub fn read_signed<T: SignedInt>(&mut self, bits: u8) -> BitResult<T> {
        self.try_read_signed(bits)?
            .ok_or_else(|| self.end_of_buffer(usize::from(bits) + 1))
    }

    /// Reads a single bit as a boolean.
    pub fn read_bool(&mut self) -> BitResult<bool> {
        self.try_read_bool().ok_or_else(|| self.end_of_buffer(1))
    }

    /// Reads the 32 raw bits of an `f32`.
    pub fn read_f32(&mut self) -> BitResult<f32> {
        self.try_read_f32().ok_or_else(|| self.end_of_buffer(32))
    }

    /// Reads the 64 raw bits of an `f64`.
    pub fn read_f64(&mut self) -> BitResult<f64> {
        self.try_read_f64().ok_or_else(|| self.end_of_buffer(64))
    }

    /// Reads length-prefixed text in the given encoding.
    pub fn read_text(&mut self, encoding: TextEncoding) -> BitResult<String> {
        self.text(encoding)?
            .map_err(|requested| self.end_of_buffer(requested))
    }

    /// Reads length-prefixed UTF-8 text.
    pub fn read_str(&mut self) -> BitResult<String> {
        self.read_text(TextEncoding::Utf8)
    }

    /// Reads `bits` bits into `ceil(bits / 8)` left-aligned bytes.
    pub fn read_bytes(&mut self, bits: usize) -> BitResult<Vec<u8>> {
        self.try_read_bytes(bits)?
            .ok_or_else(|| self.end_of_buffer(bits))
    }

    /// Skips `bits` bits.
    pub fn skip(&mut self, bits: usize) -> BitResult<()> {
        if !self.has(bits) {
            return Err(self.end_of_buffer(bits));
        }
        self.cursor.advance(bits);
        Ok(())
    }

    /// Reads text, returning `Ok(Err(bits))` with the total bit count
    /// needed when the buffer runs short.
    fn text(&mut self, encoding: TextEncoding) -> BitResult<Result<String, usize>> {
        let start = self.cursor;
        if !self.has(32) {
            return Ok(Err(32));
        }
        let len = self.take(32) as usize;

        let max = self.limits.max_text_bytes;
        if len > max {
            self.cursor = start;
            return Err(BitError::TextTooLong { len, max });
        }
        let bits = len.saturating_mul(8);
        if !self.has(bits) {
            self.cursor = start;
            return Ok(Err(bits.saturating_add(32)));
        }

        let bytes: Vec<u8> = (0..len).map(|_| self.take(8) as u8).collect();
        Ok(Ok(encoding.decode(&bytes)))
    }

    const fn has(&self, bits: usize) -> bool {
        bits <= self.remaining_bits()
    }

    fn end_of_buffer(&self, requested: usize) -> BitError {
        BitError::EndOfBuffer {
            requested,
            available: self.remaining_bits(),
        }
    }

    /// Pulls `bits` bits from the cursor, one byte segment at a time.
    /// Callers check `bits` against `1..=64` and the remaining length first.
    fn take(&mut self, bits: u8) -> u64 {
        let mut value = 0u64;
        let mut remaining = bits;
        while remaining > 0 {
            let offset = self.cursor.offset();
            let take = remaining.min(self.cursor.bits_left_in_byte());
            let byte = self.data[self.cursor.byte()];
            let segment = (byte & widening_mask(take, offset)) >> (8 - offset - take);

            value = (value << take) | u64::from(segment);
            self.cursor.advance(usize::from(take));
            remaining -= take;
        }
        value
    }
}
