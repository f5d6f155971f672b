//! Bit-level output for DEFLATE streams.
//!
//! `BitWriter` packs variable-length codes into a caller-supplied byte slice.
//! The slice is the whole output budget: the writer never grows it, and a
//! write that does not fit fails with
//! [`PdflateError::OutputBufferExhausted`] instead of truncating.
//!
//! # Bit Ordering
//!
//! DEFLATE packs bits LSB-first: the first bit written lands in the least
//! significant bit of the first byte. Huffman codes must therefore be
//! bit-reversed before they are handed to the writer.
//!
//! # Example
//!
//! ```
//! use pdflate_core::bitstream::BitWriter;
//!
//! let mut output = [0u8; 4];
//! let mut writer = BitWriter::new(&mut output);
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11001, 5).unwrap();
//! let len = writer.finish().unwrap();
//! assert_eq!(&output[..len], &[0xCD]);
//! ```

use crate::error::{PdflateError, Result};

/// A bit-level writer over a fixed-capacity byte slice.
///
/// Bits accumulate in a 32-bit buffer and are moved to the slice two bytes
/// at a time, so fewer than 16 bits are pending between calls.
#[derive(Debug)]
pub struct BitWriter<'a> {
    /// Output budget.
    buf: &'a mut [u8],
    /// Next byte to write.
    pos: usize,
    /// Bit buffer (LSB-first).
    bit_buffer: u32,
    /// Number of valid bits in `bit_buffer`.
    bit_count: u8,
}

impl<'a> BitWriter<'a> {
    /// Create a new `BitWriter` that writes into `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Number of whole bytes written to the slice so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the output budget.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes still free in the slice.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes the pending bits will occupy once aligned.
    pub fn pending_bytes(&self) -> usize {
        (self.bit_count as usize).div_ceil(8)
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(PdflateError::buffer_exhausted(needed, available));
        }
        Ok(())
    }

    /// Write up to 16 bits to the stream.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write (LSB-first); bits above `count` are ignored
    /// * `count` - Number of bits to write (0-16)
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 16, "Cannot write more than 16 bits at once");

        if count == 0 {
            return Ok(());
        }

        let total = self.bit_count + count;
        if total >= 16 {
            self.ensure(2)?;
        }

        let value = value & ((1u32 << count) - 1);
        self.bit_buffer |= value << self.bit_count;
        self.bit_count = total;

        if self.bit_count >= 16 {
            self.buf[self.pos] = self.bit_buffer as u8;
            self.buf[self.pos + 1] = (self.bit_buffer >> 8) as u8;
            self.pos += 2;
            self.bit_buffer >>= 16;
            self.bit_count -= 16;
        }

        Ok(())
    }

    /// Pad to byte boundary with zeros and move the pending bits out.
    pub fn align_to_byte(&mut self) -> Result<()> {
        if self.bit_count == 0 {
            return Ok(());
        }

        let bytes = self.pending_bytes();
        self.ensure(bytes)?;

        self.buf[self.pos] = self.bit_buffer as u8;
        if bytes > 1 {
            self.buf[self.pos + 1] = (self.bit_buffer >> 8) as u8;
        }
        self.pos += bytes;
        self.bit_buffer = 0;
        self.bit_count = 0;

        Ok(())
    }

    /// Write raw bytes at the next byte boundary.
    ///
    /// Pending bits are aligned first. Nothing is copied unless the whole
    /// slice fits.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.align_to_byte()?;
        self.ensure(bytes.len())?;

        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();

        Ok(())
    }

    /// Align to a byte boundary and return the number of bytes used.
    pub fn finish(mut self) -> Result<usize> {
        self.align_to_byte()?;
        Ok(self.pos)
    }
}
