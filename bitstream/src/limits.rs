//! Configurable limits for bounded encoding and decoding.

/// Limits applied by [`BitWriter`](crate::BitWriter) and
/// [`BitReader`](crate::BitReader).
///
/// The default accepts any text the 32-bit length prefix can describe.
/// A tighter cap is opt-in, for readers that take input from untrusted
/// peers and want to refuse large length prefixes up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum encoded length of a text value in bytes.
    pub max_text_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self { max_text_bytes: 64 }
    }

    /// Creates limits with no restrictions beyond the 32-bit length prefix.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_text_bytes: u32::MAX as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_prefix_bound() {
        assert_eq!(Limits::default(), Limits::unlimited());
    }

    #[test]
    fn testing_limits_smaller() {
        assert!(Limits::for_testing().max_text_bytes < Limits::default().max_text_bytes);
    }

    #[test]
    fn unlimited_matches_prefix_width() {
        assert_eq!(Limits::unlimited().max_text_bytes, u32::MAX as usize);
    }
}
