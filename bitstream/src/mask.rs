//! Precomputed byte masks for sub-byte field access.
//!
//! A *narrowing* mask keeps the low `n` bits of a byte. A *widening* mask
//! positions those `n` bits at a bit offset counted from the MSB, so a field
//! can be pulled out of (or deposited into) a byte without touching its
//! neighbours.

/// Narrowing masks indexed by bit count. Entry 0 is unused.
pub const NARROWING_MASKS: [u8; 9] = build_narrowing();

const fn build_narrowing() -> [u8; 9] {
    let mut table = [0u8; 9];
    let mut n = 1;
    while n <= 8 {
        table[n] = ((1u16 << n) - 1) as u8;
        n += 1;
    }
    table
}

/// Returns a byte with its low `n` bits set.
///
/// # Panics
///
/// Panics if `n > 8`.
#[must_use]
pub const fn narrowing_mask(n: u8) -> u8 {
    NARROWING_MASKS[n as usize]
}

/// Returns a byte with `n` bits set at `[offset, offset + n)`, counted from
/// the MSB (offset 0 is the MSB).
///
/// Bits that would fall past the LSB are dropped, so callers keep
/// `offset + n <= 8`.
///
/// # Panics
///
/// Panics if `n > 8` or `offset > 7`.
#[must_use]
pub const fn widening_mask(n: u8, offset: u8) -> u8 {
    if n == 0 {
        return 0;
    }
    (narrowing_mask(n) << (8 - n)) >> offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_table_values() {
        assert_eq!(
            NARROWING_MASKS,
            [0x00, 0x01, 0x03, 0x07, 0x0F, 0x1F, 0x3F, 0x7F, 0xFF]
        );
    }

    #[test]
    fn narrowing_mask_bit_counts() {
        for n in 1..=8u8 {
            assert_eq!(narrowing_mask(n).count_ones(), u32::from(n));
            assert_eq!(narrowing_mask(n).leading_zeros(), u32::from(8 - n));
        }
    }

    #[test]
    fn widening_mask_positions() {
        assert_eq!(widening_mask(1, 0), 0b1000_0000);
        assert_eq!(widening_mask(3, 2), 0b0011_1000);
        assert_eq!(widening_mask(4, 4), 0b0000_1111);
        assert_eq!(widening_mask(8, 0), 0xFF);
        assert_eq!(widening_mask(1, 7), 0b0000_0001);
    }

    #[test]
    fn widening_mask_every_valid_pair() {
        for n in 1..=8u8 {
            for offset in 0..=(8 - n) {
                let mask = widening_mask(n, offset);
                assert_eq!(mask.count_ones(), u32::from(n), "n={n} offset={offset}");
                assert_eq!(mask.leading_zeros(), u32::from(offset), "n={n} offset={offset}");
            }
        }
    }

    #[test]
    fn widening_mask_zero_bits() {
        assert_eq!(widening_mask(0, 3), 0);
    }
}
