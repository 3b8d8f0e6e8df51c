use super::*;

#[test]
fn test_all_ones_ranges() {
    for lo in 0..32u32 {
        for hi in lo..32u32 {
            let expected = ((1u64 << (hi - lo + 1)) - 1) as u32;
            assert_eq!(u32::MAX.bits(lo..=hi), expected, "range {lo}..={hi}");
        }
    }
    assert_eq!(u64::MAX.bits(0..=63), u64::MAX);
    assert_eq!(u8::MAX.bits(0..=7), u8::MAX);
    assert_eq!(u16::MAX.bits(3..=9), 0x7F);
}

#[test]
fn test_single_bit_matches_shift_and_mask() {
    let values: [u64; 4] = [0, 0xDEAD_BEEF_0BAD_F00D, u64::MAX, 0x8000_0000_0000_0001];
    for value in values {
        for position in 0..64 {
            assert_eq!(value.bit(position), (value >> position) & 1 == 1);
        }
    }
}

#[test]
fn test_bits_examples() {
    assert_eq!(0x1234u16.bits(4..=7), 0x3);
    assert_eq!(0x1234u16.bits(12..=15), 0x1);
    assert_eq!(0b1100_0000u8.bits(6..=7), 0b11);
    assert_eq!(0x3FFF_FFFFu32.bits(0..=29), 0x3FFF_FFFF);
    assert_eq!(0xFFFF_FFFFu32.bits(30..=31), 0b11);
}

#[test]
#[should_panic]
fn test_bits_out_of_range_panics() {
    let _ = 0u8.bits(4..=8);
}

#[test]
fn test_bcd_all_digit_pairs() {
    for value in 0..=99u8 {
        let encoded = to_bcd(value).unwrap();
        assert_eq!(bcd(encoded), Some(value));
    }
    assert_eq!(to_bcd(100), None);
}

#[test]
fn test_bcd_rejects_invalid_nibbles() {
    assert_eq!(bcd(0x0A), None);
    assert_eq!(bcd(0xA0), None);
    assert_eq!(bcd(0xFF), None);
    assert_eq!(bcd(0x59), Some(59));
}

#[test]
fn test_big_endian_reads() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
    assert_eq!(be_u16(&data, 0), Some(0x0102));
    assert_eq!(be_u32(&data, 4), Some(0x0506_0708));
    assert_eq!(be_u64(&data, 0), Some(0x0102_0304_0506_0708));
    assert_eq!(be_u16(&data, 7), None);
    assert_eq!(be_u32(&data, 6), None);
}
