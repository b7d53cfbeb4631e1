//! Integer widths supported by the typed read/write API.

mod sealed {
    pub trait Sealed {}
}

/// A primitive integer that can be packed into a bit stream.
///
/// Implemented for `u8`..`u64` and `i8`..`i64`. The raw form is the value's
/// bit pattern zero-extended to 64 bits, so signed types written with
/// [`BitWriter::write`](crate::BitWriter::write) keep their two's complement
/// bits and carry no separate sign.
pub trait PackedInt: sealed::Sealed + Copy + Default + std::fmt::Debug {
    /// Width of the type in bits.
    const BITS: u8;

    /// Bit pattern zero-extended to 64 bits.
    fn to_raw(self) -> u64;

    /// Truncates a raw bit pattern to this type.
    fn from_raw(raw: u64) -> Self;
}

/// A signed integer that can be written in sign-magnitude form.
pub trait SignedInt: PackedInt {
    /// Returns `true` for values below zero.
    fn is_negative(self) -> bool;

    /// Absolute value as an unsigned magnitude.
    fn magnitude(self) -> u64;

    /// Rebuilds a value from a sign flag and a magnitude.
    ///
    /// The magnitude must fit in `BITS - 1` bits.
    fn from_sign_magnitude(negative: bool, magnitude: u64) -> Self;
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl PackedInt for $ty {
            const BITS: u8 = <$ty>::BITS as u8;

            #[inline]
            fn to_raw(self) -> u64 {
                u64::from(self)
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                raw as $ty
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty => $uty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl PackedInt for $ty {
            const BITS: u8 = <$ty>::BITS as u8;

            #[inline]
            fn to_raw(self) -> u64 {
                u64::from(self as $uty)
            }

            #[inline]
            fn from_raw(raw: u64) -> Self {
                raw as $uty as $ty
            }
        }

        impl SignedInt for $ty {
            #[inline]
            fn is_negative(self) -> bool {
                self < 0
            }

            #[inline]
            fn magnitude(self) -> u64 {
                u64::from(self.unsigned_abs())
            }

            #[inline]
            fn from_sign_magnitude(negative: bool, magnitude: u64) -> Self {
                let value = magnitude as $uty as $ty;
                if negative {
                    value.wrapping_neg()
                } else {
                    value
                }
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64);
impl_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);
