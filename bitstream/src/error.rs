//! Error types for bitstream operations.

use std::fmt;

use crate::text::TextEncoding;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level encoding/decoding.
///
/// `InvalidBitCount`, `EmptyBuffer` and `EmptyRange` are caller mistakes and
/// are raised by every entry point. `EndOfBuffer` is only raised by the
/// non-`try_` read methods; the `try_` methods report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Invalid bit count for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: usize,
        /// Maximum allowed bits for this operation.
        max_bits: usize,
    },

    /// A reader was constructed over an empty buffer.
    EmptyBuffer,

    /// A byte range write was given no bytes.
    EmptyRange,

    /// Text is longer than the configured limit.
    TextTooLong {
        /// Encoded length in bytes.
        len: usize,
        /// Configured maximum in bytes.
        max: usize,
    },

    /// Text cannot be represented in the requested encoding.
    InvalidText {
        /// The encoding in use.
        encoding: TextEncoding,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(
                    f,
                    "invalid bit count {bits}, expected 1 to {max_bits} bits"
                )
            }
            Self::EmptyBuffer => write!(f, "cannot read from an empty buffer"),
            Self::EmptyRange => write!(f, "cannot write an empty byte range"),
            Self::TextTooLong { len, max } => {
                write!(f, "text of {len} bytes exceeds the limit of {max} bytes")
            }
            Self::InvalidText { encoding } => {
                write!(f, "text is not valid {encoding}")
            }
        }
    }
}

impl std::error::Error for BitError {}
