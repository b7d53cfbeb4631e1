#![no_main]

use bitstream::{BitReader, TextEncoding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut reader) = BitReader::new(data) else {
        return;
    };
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        let width = (data[idx] >> 3) % 64 + 1;
        idx += 1;

        let before = reader.bit_position();
        let moved = match op {
            0 => reader.try_read_bool().is_some(),
            1 => matches!(reader.try_read_bits(width), Ok(Some(_))),
            2 => matches!(reader.try_read_signed::<i64>(width.min(63)), Ok(Some(_))),
            3 => matches!(reader.try_read::<u16>(width % 16 + 1), Ok(Some(_))),
            4 => reader.try_read_f64().is_some(),
            // Default limits and lossy decoding leave no validation error
            // for text reads.
            5 => reader.try_read_str().expect("text read failed").is_some(),
            6 => reader
                .try_read_text(TextEncoding::Utf16Le)
                .expect("text read failed")
                .is_some(),
            _ => matches!(reader.try_read_bytes(usize::from(width)), Ok(Some(_))),
        };
        if !moved {
            assert_eq!(reader.bit_position(), before);
        }
    }
});
