//! Zlib framing (RFC 1950) for DEFLATE streams.
//!
//! # Format
//!
//! ```text
//! +---+---+============+---+---+---+---+
//! |CMF|FLG| compressed |    ADLER32    |
//! +---+---+============+---+---+---+---+
//! ```
//!
//! - CMF: Compression Method and Flags
//!   - Bits 0-3: CM (Compression Method) - must be 8 for DEFLATE
//!   - Bits 4-7: CINFO (Compression Info) - log2(window size) - 8
//! - FLG: Flags
//!   - Bits 0-4: FCHECK - check bits so (CMF*256 + FLG) mod 31 == 0
//!   - Bit 5: FDICT - preset dictionary present
//!   - Bits 6-7: FLEVEL - compression level (0-3)
//! - Compressed data (DEFLATE format)
//! - ADLER32: Adler-32 checksum of uncompressed data (big-endian)

use crate::deflate::{DeflateEngine, Deflated};
use pdflate_core::error::Result;

/// CMF byte: CM=8 (DEFLATE), CINFO=7 (32KB window).
pub const CMF: u8 = 0x78;

/// FLEVEL of the header: default compression.
const FLEVEL_DEFAULT: u8 = 2;

/// Header written in front of every stream: 32KB window, default level, no
/// dictionary.
pub const ZLIB_HEADER: [u8; 2] = zlib_header(FLEVEL_DEFAULT);

/// Length of the zlib header.
pub const HEADER_LEN: usize = 2;

/// Length of the Adler-32 trailer.
pub const TRAILER_LEN: usize = 4;

/// Build a zlib header for compression level indicator `flevel` (0-3)
/// without a preset dictionary.
const fn zlib_header(flevel: u8) -> [u8; 2] {
    let flg = flevel << 6;
    let remainder = ((CMF as u16) * 256 + flg as u16) % 31;
    let fcheck = if remainder == 0 { 0 } else { 31 - remainder as u8 };
    [CMF, flg | fcheck]
}

/// Adler-32 trailer bytes (big-endian).
#[inline]
pub fn trailer(checksum: u32) -> [u8; TRAILER_LEN] {
    checksum.to_be_bytes()
}

/// Compress `input` into a zlib stream with the default settings.
///
/// # Example
///
/// ```
/// use pdflate_deflate::zlib::zlib_compress;
///
/// let data = b"BT /F1 12 Tf 72 712 Td (Hello) Tj ET ".repeat(20);
/// let deflated = zlib_compress(&data).unwrap();
/// let stream = deflated.into_data().unwrap();
/// assert_eq!(&stream[..2], &[0x78, 0x9C]);
/// assert!(stream.len() < data.len());
/// ```
pub fn zlib_compress(input: &[u8]) -> Result<Deflated> {
    DeflateEngine::default().compress(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Whether `header` is a zlib header a DEFLATE decoder accepts: method 8,
    /// window at most 32KB, check bits valid, no preset dictionary.
    fn is_valid_header(header: [u8; 2]) -> bool {
        let [cmf, flg] = header;
        cmf & 0x0F == 8
            && cmf >> 4 <= 7
            && flg & 0x20 == 0
            && u16::from_be_bytes(header) % 31 == 0
    }

    #[test]
    fn test_default_header() {
        assert_eq!(ZLIB_HEADER, [0x78, 0x9C]);
        assert!(is_valid_header(ZLIB_HEADER));
    }

    #[test]
    fn test_headers_for_all_levels() {
        assert_eq!(zlib_header(0), [0x78, 0x01]);
        assert_eq!(zlib_header(1), [0x78, 0x5E]);
        assert_eq!(zlib_header(3), [0x78, 0xDA]);
        for flevel in 0..=3 {
            assert!(is_valid_header(zlib_header(flevel)));
        }
    }

    #[test]
    fn test_invalid_headers() {
        assert!(!is_valid_header([0x78, 0x9D]));
        // preset dictionary
        assert!(!is_valid_header([0x78, 0xBB]));
        // method 7
        assert!(!is_valid_header([0x77, 0x9C]));
    }

    #[test]
    fn test_trailer_is_big_endian() {
        assert_eq!(trailer(0x024D_0127), [0x02, 0x4D, 0x01, 0x27]);
    }
}
