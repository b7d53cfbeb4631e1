//! Sub-byte bit packing primitives for the bitpack codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for packing primitive
//! values at arbitrary bit widths into a contiguous buffer.
//!
//! # Wire format
//!
//! - Bits are packed MSB-first within each byte, with no padding between
//!   fields. A 3-bit field followed by a 5-bit field fills exactly one byte.
//! - Unsigned integers are plain binary, zero-extended.
//! - Signed integers written with `write_signed` are one sign bit
//!   (1 = negative) followed by the magnitude. This is sign-magnitude, not
//!   two's complement.
//! - Booleans are one bit. Floats are always their full IEEE width.
//! - Text is a 32-bit byte count followed by the encoded bytes.
//! - There are no type tags, versions or checksums. Readers must issue the
//!   same sequence of reads, with the same widths, as the writer did.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked before the cursor moves.
//! - **No domain knowledge** - This crate knows nothing about records or fields.
//! - **Explicit errors** - Invalid bit counts are errors; running out of
//!   input is `Ok(None)` on the `try_` methods and an error elsewhere.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bool(true);
//! writer.write(6, 24u8).unwrap();
//! writer.write_signed(6, -23i32).unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes.len(), 2);
//!
//! let mut reader = BitReader::new(&bytes).unwrap();
//! assert!(reader.read_bool().unwrap());
//! assert_eq!(reader.read::<u8>(6).unwrap(), 24);
//! assert_eq!(reader.read_signed::<i32>(6).unwrap(), -23);
//! ```

mod cursor;
mod error;
mod int;
mod limits;
pub mod mask;
mod reader;
mod text;
mod writer;

pub use cursor::BitCursor;
pub use error::{BitError, BitResult};
pub use int::{PackedInt, SignedInt};
pub use limits::Limits;
pub use reader::BitReader;
pub use text::{ParseEncodingError, TextEncoding};
pub use writer::BitWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer_produces_no_bytes() {
        let writer = BitWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());
        assert_eq!(BitReader::new(&bytes).unwrap_err(), BitError::EmptyBuffer);
    }

    #[test]
    fn bools_roundtrip() {
        let values = [
            true, false, false, true, true, true, true, false, false, true,
        ];
        let mut writer = BitWriter::new();
        for value in values {
            writer.write_bool(value);
        }
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 2);

        let mut reader = BitReader::new(&bytes).unwrap();
        for value in values {
            assert_eq!(reader.read_bool().unwrap(), value);
        }
    }

    #[test]
    fn unsigned_6_bits_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write(6, 24u32).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes).unwrap();
        assert_eq!(reader.read::<u32>(6).unwrap(), 24);
    }

    #[test]
    fn signed_6_bits_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_signed(6, -23i32).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes).unwrap();
        assert_eq!(reader.read_signed::<i32>(6).unwrap(), -23);
    }

    #[test]
    fn ascii_text_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_text("data", TextEncoding::Ascii).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes, [0, 0, 0, 4, 0x64, 0x61, 0x74, 0x61]);

        let mut reader = BitReader::new(&bytes).unwrap();
        assert_eq!(reader.read_text(TextEncoding::Ascii).unwrap(), "data");
    }

    #[test]
    fn bits_roundtrip_various_sizes() {
        let test_cases = [
            (0b1010u64, 4),
            (0xFFu64, 8),
            (0xABCDu64, 16),
            (0x1234_5678u64, 32),
            (u64::MAX, 64),
        ];

        for (value, bits) in test_cases {
            let mut writer = BitWriter::new();
            writer.write_bits(value, bits).unwrap();
            let bytes = writer.finish();

            let mut reader = BitReader::new(&bytes).unwrap();
            let read_value = reader.read_bits(bits).unwrap();
            assert_eq!(
                read_value, value,
                "roundtrip failed for {bits}-bit value {value}"
            );
        }
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_bool(true);
        writer.write_bits(0b1010, 4).unwrap();
        writer.write_bool(false);
        writer.write(8, 0xFFu8).unwrap();
        writer.write_signed(7, -42i16).unwrap();
        writer.write_f32(3.25);
        writer.write_str("héllo").unwrap();
        writer.write_bytes(10, &[0xDE, 0xC0]).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes).unwrap();
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert!(!reader.read_bool().unwrap());
        assert_eq!(reader.read::<u8>(8).unwrap(), 0xFF);
        assert_eq!(reader.read_signed::<i16>(7).unwrap(), -42);
        assert_eq!(reader.read_f32().unwrap(), 3.25);
        assert_eq!(reader.read_str().unwrap(), "héllo");
        assert_eq!(reader.read_bytes(10).unwrap(), vec![0xDE, 0xC0]);
    }
}
