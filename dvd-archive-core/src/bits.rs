//! Bit-field and BCD helpers for decoding packed on-disc values.

use std::ops::RangeInclusive;

/// Extraction of bit ranges from unsigned integers.
///
/// Ranges are inclusive and counted from the least significant bit, so
/// `0x1234u16.bits(4..=7)` is `0x3`.
pub trait Bits: Copy {
    const WIDTH: u32;

    fn bits(self, range: RangeInclusive<u32>) -> Self;

    fn bit(self, position: u32) -> bool;
}

macro_rules! impl_bits {
    ($($t:ty),*) => {$(
        impl Bits for $t {
            const WIDTH: u32 = <$t>::BITS;

            fn bits(self, range: RangeInclusive<u32>) -> Self {
                let (lo, hi) = (*range.start(), *range.end());
                assert!(lo <= hi && hi < Self::WIDTH, "bit range {lo}..={hi} out of bounds");
                let shifted = self >> lo;
                let width = hi - lo + 1;
                if width == Self::WIDTH {
                    shifted
                } else {
                    shifted & ((1 << width) - 1)
                }
            }

            fn bit(self, position: u32) -> bool {
                self.bits(position..=position) != 0
            }
        }
    )*};
}

impl_bits!(u8, u16, u32, u64);

/// Decode one binary-coded-decimal byte (two decimal digits).
///
/// Returns `None` when either nibble is above 9.
pub fn bcd(byte: u8) -> Option<u8> {
    let (high, low) = (byte.bits(4..=7), byte.bits(0..=3));
    if high > 9 || low > 9 {
        None
    } else {
        Some(high * 10 + low)
    }
}

/// Encode a value in 0..=99 as a BCD byte.
pub fn to_bcd(value: u8) -> Option<u8> {
    if value > 99 {
        None
    } else {
        Some(((value / 10) << 4) | (value % 10))
    }
}

/// Read a big-endian `u16` at `offset`, or `None` if the slice is too short.
pub fn be_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Read a big-endian `u32` at `offset`, or `None` if the slice is too short.
pub fn be_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a big-endian `u64` at `offset`, or `None` if the slice is too short.
pub fn be_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset + 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

#[cfg(test)]
#[path = "tests/bits_tests.rs"]
mod tests;
