//! Bit cursor shared by the reader and writer.

/// Position of the next bit to read or write.
///
/// `bit` is 1-based and counted from the MSB of the current byte: bit 1 is
/// the MSB, bit 8 the LSB. Advancing past bit 8 moves to bit 1 of the next
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitCursor {
    byte: usize,
    bit: u8,
}

impl Default for BitCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl BitCursor {
    /// Cursor at the MSB of byte 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { byte: 0, bit: 1 }
    }

    /// Cursor at an absolute bit position.
    #[must_use]
    pub const fn at(position: usize) -> Self {
        Self {
            byte: position / 8,
            bit: (position % 8) as u8 + 1,
        }
    }

    /// Index of the current byte.
    #[must_use]
    pub const fn byte(&self) -> usize {
        self.byte
    }

    /// 1-based bit offset within the current byte.
    #[must_use]
    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// 0-based bit offset within the current byte, as used by the masks.
    #[must_use]
    pub const fn offset(&self) -> u8 {
        self.bit - 1
    }

    /// Number of bits before the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.byte * 8 + (self.bit as usize - 1)
    }

    /// Bits left in the current byte, including the one under the cursor.
    #[must_use]
    pub const fn bits_left_in_byte(&self) -> u8 {
        9 - self.bit
    }

    /// Returns `true` when the cursor sits on the MSB of a byte.
    #[must_use]
    pub const fn is_byte_aligned(&self) -> bool {
        self.bit == 1
    }

    /// Moves the cursor forward by `bits`.
    pub fn advance(&mut self, bits: usize) {
        *self = Self::at(self.position() + bits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_msb_of_first_byte() {
        let cursor = BitCursor::new();
        assert_eq!(cursor.byte(), 0);
        assert_eq!(cursor.bit(), 1);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.position(), 0);
        assert!(cursor.is_byte_aligned());
        assert_eq!(cursor, BitCursor::default());
    }

    #[test]
    fn advance_within_byte() {
        let mut cursor = BitCursor::new();
        cursor.advance(3);
        assert_eq!(cursor.byte(), 0);
        assert_eq!(cursor.bit(), 4);
        assert_eq!(cursor.bits_left_in_byte(), 5);
    }

    #[test]
    fn advance_to_exact_boundary_wraps() {
        let mut cursor = BitCursor::new();
        cursor.advance(5);
        cursor.advance(3);
        assert_eq!(cursor.byte(), 1);
        assert_eq!(cursor.bit(), 1);
        assert!(cursor.is_byte_aligned());
    }

    #[test]
    fn advance_across_bytes() {
        let mut cursor = BitCursor::new();
        cursor.advance(6);
        cursor.advance(13);
        assert_eq!(cursor.position(), 19);
        assert_eq!(cursor.byte(), 2);
        assert_eq!(cursor.bit(), 4);
    }

    #[test]
    fn at_matches_position() {
        for position in 0..64 {
            assert_eq!(BitCursor::at(position).position(), position);
        }
    }
}
