//! Generator constants lifted from the game binary.
//!
//! Each of the 68 streams has its own multiplier/xor pair. The pairs were
//! recovered from the disassembled generator routine; they are opaque data,
//! not derived from anything. NEVER edit a pair; every downstream
//! prediction depends on this table bit-for-bit.

/// Per-stream `(multiplier, xor)` pairs, indexed by stream number 0..68.
///
/// The multiplier is applied as a wrapping signed 32-bit multiply, the xor
/// constant as a bitwise xor on the full 32-bit state.
pub const STREAM_CONSTANTS: [(u32, u32); 68] = [
    (0xe809d70d, 0x1165dfb1), (0xd5ccba75, 0x4b0c1aed),
    (0x98cb0dad, 0xd6aa4be7), (0x9bbcce2d, 0xcdee9193),
    (0xfa148f6d, 0x11d7d77c), (0x41543771, 0xfe8306b4),
    (0xf853f53b, 0xb9f62530), (0x4841a319, 0x3f2bd2d3),
    (0x572b593b, 0xac225c54), (0x0b6e361f, 0x4718c3ac),
    (0x1b1abd6d, 0x1790499b), (0xf13d6bab, 0x42398b91),
    (0x25edd929, 0xf898df95), (0x5b713b39, 0xdd6a922f),
    (0x25559f59, 0x846c4eae), (0xa43c87fd, 0x765a8100),
    (0x5f446891, 0xa7ae53e5), (0x55b2883b, 0x49beac52),
    (0x9fa3bc1d, 0x783ea82a), (0x774c7c31, 0x4ccd8911),
    (0xc016c237, 0x5ea0e75f), (0x5f18529d, 0x2068ad78),
    (0xd81c9675, 0x06e459a2), (0x6575bfcd, 0xca05835e),
    (0xe485d281, 0xe20360f6), (0x159db793, 0xe2c11aaa),
    (0x6b5b5dd5, 0x9a68f1cc), (0x176679e9, 0x8d731ce7),
    (0xf27eb989, 0x824bd998), (0xb4b150bd, 0x71395c30),
    (0x6bc85731, 0xe42329c6), (0x55e9ea1d, 0x6c64ff60),
    (0x46471d85, 0x269f1f1f), (0x08ee67e5, 0x0f850ed0),
    (0x631d5941, 0xebaba410), (0xefe296f5, 0x41119ec8),
    (0x9e4794fb, 0xe85b9c96), (0xb0e91d95, 0xca273912),
    (0x3370bb51, 0x0a0e4e88), (0xfc7fbd9f, 0xefb698a5),
    (0xd38ad8cf, 0xaddeeb63), (0x1f837671, 0x8a18971a),
    (0x6b0a0033, 0x26079400), (0x1c9d6385, 0x3bc273d7),
    (0x794da3b7, 0xff02d299), (0xd75899c1, 0x8f905625),
    (0x35b88473, 0x1aa3082b), (0x0a9ded1f, 0x20ebc2cd),
    (0x79d6940b, 0xc46ba389), (0x566085c5, 0xc7ea2055),
    (0x637b25b1, 0x39d76d12), (0xa995ec7d, 0xe05f4696),
    (0x9ef3d419, 0x7677985d), (0x6cf3f321, 0xdd7d1652),
    (0x3019f661, 0xe733f5ae), (0x97f47443, 0x3a74a9ed),
    (0x3625d367, 0x004dabcc), (0x7181d01f, 0x1386ac49),
    (0xfdac6a3b, 0x2f509e78), (0xd535dfb9, 0x087d48ee),
    (0x89a3e95b, 0xbba4aed1), (0x7021de63, 0x648ed072),
    (0x72a7b71f, 0xa18ff4ce), (0xea21838b, 0x92a0c5af),
    (0xac4d8ec9, 0xde82018e), (0xded91425, 0x7d22bc72),
    (0x20ba4c33, 0x0dc67379), (0x310c3711, 0x1c13f796),
];

/// Multiplier of the seed-derivation recurrence (§ seed derivation).
pub const SEED_MULTIPLIER: i32 = 0x41C6_4E6D;

/// Increment of the seed-derivation recurrence.
pub const SEED_INCREMENT: i32 = 12345;

/// The game's 32-bit wraparound rotate-by-16.
///
/// Arithmetic shift right, wrapping shift left, wrapping add: exactly the
/// instruction sequence the original binary uses.
#[inline]
pub fn rotate16(v: i32) -> i32 {
    (v >> 16).wrapping_add(v.wrapping_shl(16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_multipliers_are_odd() {
        // An even multiplier would collapse the low bits of the state.
        for (i, (c1, _)) in STREAM_CONSTANTS.iter().enumerate() {
            assert_eq!(c1 & 1, 1, "stream {i} multiplier is even");
        }
    }

    #[test]
    fn rotate16_small_value() {
        assert_eq!(rotate16(1), 0x1_0000);
        assert_eq!(rotate16(0x1_0000), 1);
    }

    #[test]
    fn rotate16_negative_uses_arithmetic_shift() {
        // -1 >> 16 stays -1; -1 << 16 is -65536; the sum wraps to -65537.
        assert_eq!(rotate16(-1), -65537);
    }

    #[test]
    fn rotate16_wraps_instead_of_overflowing() {
        // Both halves near the sign boundary; plain addition would overflow.
        let v = i32::MIN | 0xffff;
        let expected = (v >> 16).wrapping_add(v.wrapping_shl(16));
        assert_eq!(rotate16(v), expected);
    }
}
