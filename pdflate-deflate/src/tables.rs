//! Constant tables for DEFLATE compression (RFC 1951).
//!
//! Everything here is computed at compile time by `const fn` builders and
//! shared by all compressor instances.

/// Maximum distance of a back-reference (32KB window).
pub const WINDOW_SIZE: usize = 32768;

/// Mask for indexing the per-position hash chain.
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Number of hash heads (16-bit hash).
pub const HASH_TABLE_SIZE: usize = 65536;

/// Minimum match length.
pub const MIN_MATCH: usize = 3;

/// Maximum match length.
pub const MAX_MATCH: usize = 258;

/// End of block symbol.
pub const END_OF_BLOCK: usize = 256;

/// Largest payload of a single stored block.
pub const MAX_STORED_BLOCK: usize = 65535;

/// Number of symbols in the static literal/length table (286 and 287 are
/// never used but have codes).
pub const STATIC_LITERAL_CODES: usize = 288;

/// Number of distance codes.
pub const DISTANCE_CODES: usize = 30;

/// Order in which bit-length code lengths are transmitted (RFC 1951 Section 3.2.7).
pub const BIT_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Reverse a 16-bit left-aligned code so it can be emitted LSB-first.
///
/// A code of `n` bits stored in the top `n` bits of a 16-bit word comes out
/// as the same code reversed in the low `n` bits.
#[inline]
pub const fn reverse16(value: u32) -> u16 {
    (value as u16).reverse_bits()
}

/// Translation of the third byte of a hash key.
///
/// Even bits 0, 2, 4, 6 move to bits 15, 14, 13, 12 and odd bits 1, 3, 5, 7
/// move to bits 7, 6, 5, 4, so the third byte mixes into both halves of the
/// little-endian word formed by the first two bytes.
pub static HASH_XLATE: [u16; 256] = build_hash_xlate();

const fn build_hash_xlate() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut value = 0;
    while value < 256 {
        let mut out = 0u16;
        let mut bit = 0;
        while bit < 8 {
            if value & (1 << bit) != 0 {
                let target = if bit % 2 == 0 { 15 - bit / 2 } else { 7 - bit / 2 };
                out |= 1 << target;
            }
            bit += 1;
        }
        table[value] = out;
        value += 1;
    }
    table
}

/// Length code (257-285) indexed by `length - 3`.
pub static LENGTH_CODE: [u16; 256] = build_length_codes();

const fn build_length_codes() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut base = 257;
    let mut divider = 1;
    let mut next = 8;
    let mut len = 0;
    while len < 255 {
        if len == next {
            base += 4;
            divider <<= 1;
            next <<= 1;
        }
        table[len] = (base + len / divider) as u16;
        len += 1;
    }
    // 258 has its own code, not the last slot of 284
    table[255] = 285;
    table
}

/// Distance code (0-29) indexed by `distance - 1`.
pub static DISTANCE_CODE: [u8; WINDOW_SIZE] = build_distance_codes();

const fn build_distance_codes() -> [u8; WINDOW_SIZE] {
    let mut table = [0u8; WINDOW_SIZE];
    let mut base = 0;
    let mut divider = 1;
    let mut next = 4;
    let mut dist = 0;
    while dist < WINDOW_SIZE {
        if dist == next {
            base += 2;
            divider <<= 1;
            next <<= 1;
        }
        table[dist] = (base + dist / divider) as u8;
        dist += 1;
    }
    table
}

/// Number of extra bits after a length code.
#[inline]
pub const fn length_extra_bits(code: usize) -> u8 {
    if code >= 265 && code < 285 {
        ((code - 261) / 4) as u8
    } else {
        0
    }
}

/// Number of extra bits after a distance code.
#[inline]
pub const fn distance_extra_bits(code: usize) -> u8 {
    if code >= 4 { (code / 2 - 1) as u8 } else { 0 }
}

const STATIC_LITERAL: ([u16; STATIC_LITERAL_CODES], [u8; STATIC_LITERAL_CODES]) =
    build_static_literal();

/// Static literal/length codes (RFC 1951 Section 3.2.6), reversed for LSB-first output.
pub static STATIC_LITERAL_CODE: [u16; STATIC_LITERAL_CODES] = STATIC_LITERAL.0;

/// Static literal/length code lengths.
///
/// - Symbols 0-143: 8 bits
/// - Symbols 144-255: 9 bits
/// - Symbols 256-279: 7 bits
/// - Symbols 280-287: 8 bits
pub static STATIC_LITERAL_LENGTH: [u8; STATIC_LITERAL_CODES] = STATIC_LITERAL.1;

const fn build_static_literal() -> ([u16; STATIC_LITERAL_CODES], [u8; STATIC_LITERAL_CODES]) {
    let mut codes = [0u16; STATIC_LITERAL_CODES];
    let mut lengths = [0u8; STATIC_LITERAL_CODES];
    // canonical order: shortest codes first, then by symbol
    let groups: [(usize, usize, u8); 4] = [(256, 279, 7), (0, 143, 8), (280, 287, 8), (144, 255, 9)];

    let mut code = 0u32;
    let mut g = 0;
    while g < groups.len() {
        let (first, last, bits) = groups[g];
        let mut symbol = first;
        while symbol <= last {
            codes[symbol] = reverse16(code);
            lengths[symbol] = bits;
            code += 1 << (16 - bits);
            symbol += 1;
        }
        g += 1;
    }
    (codes, lengths)
}

const STATIC_DISTANCE: ([u16; DISTANCE_CODES], [u8; DISTANCE_CODES]) = build_static_distance();

/// Static distance codes: all 5 bits, reversed for LSB-first output.
pub static STATIC_DISTANCE_CODE: [u16; DISTANCE_CODES] = STATIC_DISTANCE.0;

/// Static distance code lengths.
pub static STATIC_DISTANCE_LENGTH: [u8; DISTANCE_CODES] = STATIC_DISTANCE.1;

const fn build_static_distance() -> ([u16; DISTANCE_CODES], [u8; DISTANCE_CODES]) {
    let mut codes = [0u16; DISTANCE_CODES];
    let lengths = [5u8; DISTANCE_CODES];
    let mut index = 0;
    while index < DISTANCE_CODES {
        codes[index] = reverse16((index as u32) << 11);
        index += 1;
    }
    (codes, lengths)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Length base values for codes 257-285 (RFC 1951 Section 3.2.5).
    const LENGTH_BASE: [u16; 29] = [
        3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115,
        131, 163, 195, 227, 258,
    ];

    const LENGTH_EXTRA_BITS: [u8; 29] = [
        0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
    ];

    /// Distance base values for codes 0-29.
    const DISTANCE_BASE: [u16; 30] = [
        1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
        2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
    ];

    #[test]
    fn test_length_codes_match_rfc() {
        for length in 3..=258usize {
            let code = LENGTH_CODE[length - 3] as usize;
            let slot = code - 257;
            let extra = length_extra_bits(code);
            assert_eq!(extra, LENGTH_EXTRA_BITS[slot], "length {}", length);

            let base = LENGTH_BASE[slot] as usize;
            assert!(length >= base, "length {} below base of code {}", length, code);
            assert!(length - base < (1 << extra), "length {} overflows code {}", length, code);
            // extra value is the low bits of length - 3
            assert_eq!((length - 3) & ((1 << extra) - 1), length - base);
        }
    }

    #[test]
    fn test_specific_lengths() {
        assert_eq!(LENGTH_CODE[0], 257);
        assert_eq!(LENGTH_CODE[7], 264);
        assert_eq!(LENGTH_CODE[8], 265);
        assert_eq!(LENGTH_CODE[9], 265);
        assert_eq!(LENGTH_CODE[254], 284);
        assert_eq!(LENGTH_CODE[255], 285);
    }

    #[test]
    fn test_distance_codes_match_rfc() {
        for distance in 1..=WINDOW_SIZE {
            let code = DISTANCE_CODE[distance - 1] as usize;
            let extra = distance_extra_bits(code);
            let base = DISTANCE_BASE[code] as usize;
            assert!(distance >= base, "distance {}", distance);
            assert!(distance - base < (1 << extra), "distance {}", distance);
            assert_eq!((distance - 1) & ((1 << extra) - 1), distance - base);
        }
        assert_eq!(DISTANCE_CODE[0], 0);
        assert_eq!(DISTANCE_CODE[4], 4);
        assert_eq!(DISTANCE_CODE[WINDOW_SIZE - 1], 29);
    }

    #[test]
    fn test_static_literal_codes() {
        assert_eq!(STATIC_LITERAL_LENGTH[0], 8);
        assert_eq!(STATIC_LITERAL_LENGTH[143], 8);
        assert_eq!(STATIC_LITERAL_LENGTH[144], 9);
        assert_eq!(STATIC_LITERAL_LENGTH[255], 9);
        assert_eq!(STATIC_LITERAL_LENGTH[256], 7);
        assert_eq!(STATIC_LITERAL_LENGTH[279], 7);
        assert_eq!(STATIC_LITERAL_LENGTH[280], 8);
        assert_eq!(STATIC_LITERAL_LENGTH[287], 8);

        // 00110000, 110010000, 0000000, 11000000 reversed
        assert_eq!(STATIC_LITERAL_CODE[0], 0b0000_1100);
        assert_eq!(STATIC_LITERAL_CODE[144], 0b0_0001_0011);
        assert_eq!(STATIC_LITERAL_CODE[256], 0);
        assert_eq!(STATIC_LITERAL_CODE[280], 0b0000_0011);
    }

    #[test]
    fn test_static_distance_codes() {
        assert!(STATIC_DISTANCE_LENGTH.iter().all(|&l| l == 5));
        assert_eq!(STATIC_DISTANCE_CODE[0], 0);
        assert_eq!(STATIC_DISTANCE_CODE[1], 0b10000);
        assert_eq!(STATIC_DISTANCE_CODE[6], 0b01100);
    }

    #[test]
    fn test_hash_xlate() {
        assert_eq!(HASH_XLATE[0], 0x0000);
        assert_eq!(HASH_XLATE[1], 0x8000);
        assert_eq!(HASH_XLATE[2], 0x0080);
        assert_eq!(HASH_XLATE[3], 0x8080);
        assert_eq!(HASH_XLATE[0x10], 0x2000);
        assert_eq!(HASH_XLATE[0x80], 0x0010);
        assert_eq!(HASH_XLATE[0xFF], 0xF0F0);
    }

    #[test]
    fn test_reverse16() {
        assert_eq!(reverse16(0x8000), 1);
        assert_eq!(reverse16(0x3000), 0x000C);
        assert_eq!(reverse16(0x0001), 0x8000);
    }
}
