//! Bit-level writer for encoding packed binary data.

use crate::cursor::BitCursor;
use crate::error::{BitError, BitResult};
use crate::int::{PackedInt, SignedInt};
use crate::limits::Limits;
use crate::mask::{narrowing_mask, widening_mask};
use crate::text::TextEncoding;

/// A bit-level writer for encoding packed binary data.
///
/// Fields are packed MSB-first with no padding between them. The buffer
/// grows one byte at a time, only when the cursor enters a byte that has not
/// been allocated yet, so its length is always the bit count rounded up to
/// whole bytes.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// The accumulated bytes. The last byte may be partially written.
    bytes: Vec<u8>,
    /// Next bit to write.
    cursor: BitCursor,
    limits: Limits,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BitWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Creates a new `BitWriter` enforcing the given limits.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the position of the next bit to be written.
    #[must_use]
    pub const fn cursor(&self) -> BitCursor {
        self.cursor
    }

    /// Returns the limits this writer enforces.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Writes a single bit.
    pub fn write_bool(&mut self, value: bool) {
        self.put(u64::from(value), 1);
    }

    /// Writes the low `bits` bits of `value`.
    ///
    /// Higher bits are dropped; no range check is made.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits` is 0 or above 64.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        check_bits(bits, 64)?;
        self.put(value, bits);
        Ok(())
    }

    /// Writes the low `bits` bits of an integer's bit pattern.
    ///
    /// Signed values are written as raw two's complement bits with no sign
    /// bit. Use [`write_signed`](Self::write_signed) for sign-magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits` is 0 or wider than `T`.
    pub fn write<T: PackedInt>(&mut self, bits: u8, value: T) -> BitResult<()> {
        check_bits(bits, T::BITS)?;
        self.put(value.to_raw(), bits);
        Ok(())
    }

    /// Writes a sign bit (1 = negative) followed by `bits` bits of the
    /// absolute value.
    ///
    /// This is sign-magnitude, not two's complement: `-0` cannot be
    /// produced and the type's minimum value does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits` is 0 or not narrower
    /// than `T`, since one bit is reserved for the sign.
    pub fn write_signed<T: SignedInt>(&mut self, bits: u8, value: T) -> BitResult<()> {
        check_bits(bits, T::BITS - 1)?;
        self.put(u64::from(value.is_negative()), 1);
        self.put(value.magnitude(), bits);
        Ok(())
    }

    /// Writes the 32 raw bits of an `f32`.
    pub fn write_f32(&mut self, value: f32) {
        self.put(u64::from(value.to_bits()), 32);
    }

    /// Writes the 64 raw bits of an `f64`.
    pub fn write_f64(&mut self, value: f64) {
        self.put(value.to_bits(), 64);
    }

    /// Writes `text` as a 32-bit byte count followed by the encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidText`] if `text` cannot be represented in
    /// `encoding`, or [`BitError::TextTooLong`] if the encoded form exceeds
    /// the configured limit. Nothing is written on error.
    pub fn write_text(&mut self, text: &str, encoding: TextEncoding) -> BitResult<()> {
        let encoded = encoding.encode(text)?;
        let max = self.limits.max_text_bytes.min(u32::MAX as usize);
        if encoded.len() > max {
            return Err(BitError::TextTooLong {
                len: encoded.len(),
                max,
            });
        }
        self.put(encoded.len() as u64, 32);
        for byte in encoded {
            self.put(u64::from(byte), 8);
        }
        Ok(())
    }

    /// Writes UTF-8 `text` with a 32-bit length prefix.
    pub fn write_str(&mut self, text: &str) -> BitResult<()> {
        self.write_text(text, TextEncoding::Utf8)
    }

    /// Writes the first `bits` bits of `bytes`, reading them MSB-first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::EmptyRange`] if `bytes` is empty and
    /// [`BitError::InvalidBitCount`] if `bits` is 0 or exceeds the range.
    pub fn write_bytes(&mut self, bits: usize, bytes: &[u8]) -> BitResult<()> {
        if bytes.is_empty() {
            return Err(BitError::EmptyRange);
        }
        let max_bits = bytes.len() * 8;
        if bits == 0 || bits > max_bits {
            return Err(BitError::InvalidBitCount { bits, max_bits });
        }

        let whole = bits / 8;
        for &byte in &bytes[..whole] {
            self.put(u64::from(byte), 8);
        }
        let rem = (bits % 8) as u8;
        if rem > 0 {
            self.put(u64::from(bytes[whole] >> (8 - rem)), rem);
        }
        Ok(())
    }

    /// Writes `bits` zero bits.
    pub fn pad(&mut self, mut bits: usize) {
        while bits > 0 {
            let chunk = bits.min(64);
            self.put(0, chunk as u8);
            bits -= chunk;
        }
    }

    /// Returns the bytes written so far. A partial last byte is zero-padded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the bytes written so far.
    ///
    /// The writer keeps its state and can still be inspected or written to.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.bytes);
    }

    /// Deposits the low `bits` bits of `value` at the cursor, one byte
    /// segment at a time. `bits` must be in `1..=64`.
    fn put(&mut self, value: u64, bits: u8) {
        let mut remaining = bits;
        while remaining > 0 {
            let idx = self.cursor.byte();
            if idx == self.bytes.len() {
                self.bytes.push(0);
            }
            let offset = self.cursor.offset();
            let take = remaining.min(self.cursor.bits_left_in_byte());

            let segment = (value >> (remaining - take)) as u8 & narrowing_mask(take);
            let byte = &mut self.bytes[idx];
            *byte = (*byte & !widening_mask(take, offset)) | (segment << (8 - offset - take));

            self.cursor.advance(usize::from(take));
            remaining -= take;
        }
    }
}

/// Validates a bit count against `1..=max_bits`.
pub(crate) fn check_bits(bits: u8, max_bits: u8) -> BitResult<()> {
    if bits == 0 || bits > max_bits {
        return Err(BitError::InvalidBitCount {
            bits: usize::from(bits),
            max_bits: usize::from(max_bits),
        });
    }
    Ok(())
}
