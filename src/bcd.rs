//! Packed binary-coded decimal conversion.
//!
//! Every time and alarm register of the RX-8025 stores its value as two
//! decimal digits, the tens digit in the upper nibble and the ones digit in the
//! lower nibble. Register bits that are not part of the value (century flags,
//! reserved bits) must be masked off before calling [`decode`].

/// Decodes a packed BCD byte into its binary value.
///
/// The result is only meaningful when both nibbles are in `0..=9`; see
/// [`is_valid`].
pub const fn decode(bcd: u8) -> u8 {
    bcd - 6 * (bcd >> 4)
}

/// Encodes a binary value in `0..=99` as a packed BCD byte.
pub const fn encode(value: u8) -> u8 {
    debug_assert!(value <= 99);
    value + 6 * (value / 10)
}

/// Returns `true` when both nibbles of `bcd` hold a decimal digit.
pub const fn is_valid(bcd: u8) -> bool {
    bcd >> 4 <= 9 && bcd & 0x0F <= 9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_inverse() {
        for n in 0..=99u8 {
            let bcd = encode(n);
            assert!(is_valid(bcd), "encode({}) = {:#04x} is not BCD", n, bcd);
            assert_eq!(decode(bcd), n);
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(encode(0), 0x00);
        assert_eq!(encode(9), 0x09);
        assert_eq!(encode(10), 0x10);
        assert_eq!(encode(55), 0x55);
        assert_eq!(encode(99), 0x99);

        assert_eq!(decode(0x00), 0);
        assert_eq!(decode(0x31), 31);
        assert_eq!(decode(0x59), 59);
        assert_eq!(decode(0x99), 99);
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(0x00));
        assert!(is_valid(0x99));
        assert!(!is_valid(0x0A));
        assert!(!is_valid(0xA0));
        assert!(!is_valid(0xFF));
    }

    #[test]
    fn test_decode_does_not_overflow_on_garbage() {
        // Meaningless but must not panic.
        let _ = decode(0xFF);
        let _ = decode(0xA5);
    }
}
