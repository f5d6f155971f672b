//! Adler-32 checksum (RFC 1950).
//!
//! The zlib trailer carries the Adler-32 of the uncompressed data. The
//! checksum keeps two 16-bit sums, `a` (sum of bytes, starting at 1) and `b`
//! (sum of the `a` values), both modulo 65521.
//!
//! The modulo is deferred: starting from `a, b < 65521`, 5552 bytes of 0xFF
//! is the longest run that cannot overflow a `u32` in `b`.

/// Largest prime smaller than 65536.
const ADLER_MOD: u32 = 65521;

/// Number of bytes to process before reducing.
const NMAX: usize = 5552;

/// Initial checksum value.
pub const ADLER32_INIT: u32 = 1;

/// Continue an Adler-32 checksum over `data`.
///
/// `running` is the checksum of everything seen so far (`ADLER32_INIT` for a
/// fresh stream). Checksumming a buffer in pieces yields the same value as
/// checksumming it in one call.
pub fn adler32_update(running: u32, data: &[u8]) -> u32 {
    let mut a = running & 0xFFFF;
    let mut b = running >> 16;

    for chunk in data.chunks(NMAX) {
        for &byte in chunk {
            a += byte as u32;
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }

    (b << 16) | a
}

/// Adler-32 checksum calculator.
#[derive(Clone, Debug)]
pub struct Adler32 {
    value: u32,
}

impl Adler32 {
    /// Create a new Adler-32 calculator.
    pub fn new() -> Self {
        Self {
            value: ADLER32_INIT,
        }
    }

    /// Update the checksum with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.value = adler32_update(self.value, data);
    }

    /// Return the checksum of all data so far.
    pub fn finish(&self) -> u32 {
        self.value
    }

    /// Compute Adler-32 checksum of data in one shot.
    pub fn checksum(data: &[u8]) -> u32 {
        adler32_update(ADLER32_INIT, data)
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    /// Byte-at-a-time reference with a modulo after every step.
    fn naive(data: &[u8]) -> u32 {
        let (mut a, mut b) = (1u32, 0u32);
        for &byte in data {
            a = (a + byte as u32) % ADLER_MOD;
            b = (b + a) % ADLER_MOD;
        }
        (b << 16) | a
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Adler32::checksum(b""), 1);
        assert_eq!(Adler32::checksum(b"a"), 0x0062_0062);
        assert_eq!(Adler32::checksum(b"abc"), 0x024D_0127);
        assert_eq!(Adler32::checksum(b"Wikipedia"), 0x11E6_0398);
        assert_eq!(
            Adler32::checksum(b"The quick brown fox jumps over the lazy dog"),
            0x5BDC_0FDA
        );
    }

    #[test]
    fn test_worst_case_batch_does_not_overflow() {
        // 0xFF bytes push both sums to their maxima between reductions.
        for len in [NMAX - 1, NMAX, NMAX + 1, 3 * NMAX + 17, 100_000] {
            let data = vec![0xFFu8; len];
            assert_eq!(Adler32::checksum(&data), naive(&data), "len {}", len);
        }
    }

    #[test]
    fn test_incremental_update() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 + 3) as u8).collect();
        let mut adler = Adler32::new();
        for piece in data.chunks(997) {
            adler.update(piece);
        }
        assert_eq!(adler.finish(), Adler32::checksum(&data));
    }

    quickcheck! {
        fn prop_matches_naive(data: Vec<u8>) -> bool {
            Adler32::checksum(&data) == naive(&data)
        }

        fn prop_split_anywhere(data: Vec<u8>, split: usize) -> bool {
            let at = if data.is_empty() { 0 } else { split % data.len() };
            let (head, tail) = data.split_at(at);
            adler32_update(adler32_update(ADLER32_INIT, head), tail) == Adler32::checksum(&data)
        }
    }
}
