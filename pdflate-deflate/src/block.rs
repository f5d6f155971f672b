//! Block batching, sizing and emission.
//!
//! Tokens are collected into a block buffer together with their symbol
//! frequencies. When the buffer is full (or the input ends) the block is
//! sized three ways:
//!
//! - **Stored**: the covered input bytes plus 5 bytes of header
//! - **Static**: the fixed RFC 1951 codes
//! - **Dynamic**: codes built from this block's frequencies, plus the cost of
//!   transmitting them
//!
//! and written with the cheapest encoding.

use crate::huffman::{Alphabet, CodeTable, HuffmanTree};
use crate::lz77::Token;
use crate::tables::{
    DISTANCE_CODE, END_OF_BLOCK, LENGTH_CODE, MAX_STORED_BLOCK, MIN_MATCH, distance_extra_bits,
    length_extra_bits,
};
use log::debug;
use pdflate_core::BitWriter;
use pdflate_core::error::Result;

/// Header bits of a stored block.
const STORED_BLOCK: u32 = 0;
/// Header bits of a block coded with the static codes.
const STATIC_BLOCK: u32 = 1;
/// Header bits of a block coded with dynamic codes.
const DYNAMIC_BLOCK: u32 = 2;

/// Header, padding and the LEN/NLEN fields of a stored block, in bytes.
const STORED_OVERHEAD: usize = 5;

/// Encoding used for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Uncompressed copy of the input.
    Stored,
    /// Fixed Huffman codes.
    Static,
    /// Huffman codes sent with the block.
    Dynamic,
}

/// What happened to a flushed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The block was written.
    Written(BlockKind),
    /// The last block showed that compressing does not pay; nothing was
    /// written for it.
    NotCompressible,
}

/// Number of DEFLATE blocks written, by encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockStats {
    /// Stored blocks (a large stored block counts once per 65535 bytes).
    pub stored: usize,
    /// Blocks using the static codes.
    pub static_codes: usize,
    /// Blocks using dynamic codes.
    pub dynamic_codes: usize,
}

impl BlockStats {
    /// Total number of blocks.
    pub fn total(&self) -> usize {
        self.stored + self.static_codes + self.dynamic_codes
    }

    fn record(&mut self, kind: BlockKind) {
        match kind {
            BlockKind::Stored => self.stored += 1,
            BlockKind::Static => self.static_codes += 1,
            BlockKind::Dynamic => self.dynamic_codes += 1,
        }
    }
}

/// Estimated size of a block, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSizes {
    /// With codes built for this block.
    pub dynamic: usize,
    /// With the static codes.
    pub static_codes: usize,
    /// Input bytes covered by the block.
    pub stored: usize,
}

impl BlockSizes {
    /// Size of the cheaper Huffman encoding.
    pub fn compressed(&self) -> usize {
        self.static_codes.min(self.dynamic)
    }

    /// Encoding the block will be written with.
    pub fn choice(&self) -> BlockKind {
        if self.stored + STORED_OVERHEAD <= self.compressed() {
            BlockKind::Stored
        } else if self.static_codes <= self.dynamic {
            BlockKind::Static
        } else {
            BlockKind::Dynamic
        }
    }
}

#[inline]
fn bits_to_bytes(bits: u64) -> usize {
    bits.div_ceil(8) as usize
}

/// Collects tokens into blocks and writes them.
#[derive(Debug)]
pub struct BlockCompressor<'a> {
    input: &'a [u8],
    capacity: usize,
    tokens: Vec<Token>,
    /// First input byte of the current block.
    block_start: usize,
    /// Input bytes covered by the buffered tokens.
    block_len: usize,
    /// Extra bits the buffered length and distance codes need.
    extra_bits: u64,
    first_block: bool,
    literal: HuffmanTree,
    distance: HuffmanTree,
    bit_length: HuffmanTree,
    stats: BlockStats,
}

impl<'a> BlockCompressor<'a> {
    /// Create a compressor for tokens of `input`, flushing every `capacity`
    /// tokens.
    pub fn new(input: &'a [u8], capacity: usize) -> Self {
        Self {
            input,
            capacity,
            tokens: Vec::with_capacity(capacity),
            block_start: 0,
            block_len: 0,
            extra_bits: 0,
            first_block: true,
            literal: HuffmanTree::new(Alphabet::LITERAL),
            distance: HuffmanTree::new(Alphabet::DISTANCE),
            bit_length: HuffmanTree::new(Alphabet::BIT_LENGTH),
            stats: BlockStats::default(),
        }
    }

    /// Blocks written so far.
    pub fn stats(&self) -> BlockStats {
        self.stats
    }

    /// Add a token, writing out the buffered block first if it is full.
    pub fn push(&mut self, token: Token, writer: &mut BitWriter<'_>) -> Result<()> {
        if self.tokens.len() >= self.capacity {
            // only the last block can turn out not compressible
            self.flush(false, writer)?;
        }

        match token {
            Token::Literal(byte) => self.literal.add(byte as usize),
            Token::Match { distance, length } => {
                let len_code = LENGTH_CODE[length as usize - MIN_MATCH] as usize;
                self.literal.add(len_code);
                self.extra_bits += length_extra_bits(len_code) as u64;

                let dist_code = DISTANCE_CODE[distance as usize - 1] as usize;
                self.distance.add(dist_code);
                self.extra_bits += distance_extra_bits(dist_code) as u64;
            }
        }

        self.block_len += token.len();
        self.tokens.push(token);
        Ok(())
    }

    /// Write the final block.
    pub fn finish(&mut self, writer: &mut BitWriter<'_>) -> Result<BlockOutcome> {
        self.flush(true, writer)
    }

    /// Build the trees for the buffered block and size every encoding.
    fn size_block(&mut self) -> Result<BlockSizes> {
        self.literal.add(END_OF_BLOCK);
        self.literal.build_tree()?;
        self.distance.build_tree()?;

        let bl_extra = self.literal.count_code_lengths(&mut self.bit_length)
            + self.distance.count_code_lengths(&mut self.bit_length);
        self.bit_length.build_tree()?;
        let bl_codes = self.bit_length.bit_length_codes() as u64;

        // 3 bits block header, 5 + 5 + 4 bits of code counts
        let dynamic = 17
            + 3 * bl_codes
            + self.bit_length.encoded_length()
            + bl_extra
            + self.literal.encoded_length()
            + self.distance.encoded_length()
            + self.extra_bits;

        let static_codes = 3
            + self.extra_bits
            + CodeTable::static_literal().cost(self.literal.frequencies())
            + CodeTable::static_distance().cost(self.distance.frequencies());

        Ok(BlockSizes {
            dynamic: bits_to_bytes(dynamic),
            static_codes: bits_to_bytes(static_codes),
            stored: self.block_len,
        })
    }

    fn flush(&mut self, last: bool, writer: &mut BitWriter<'_>) -> Result<BlockOutcome> {
        let sizes = self.size_block()?;
        let compressed = sizes.compressed();

        if last {
            let written = writer.position() + writer.pending_bytes();
            let cheapest = compressed.min(sizes.stored + STORED_OVERHEAD);
            if (self.first_block && sizes.stored <= compressed)
                || written + cheapest > writer.capacity()
            {
                debug!(
                    "Last block not worth compressing: {} bytes, {} compressed, {} of {} written",
                    sizes.stored,
                    compressed,
                    written,
                    writer.capacity()
                );
                return Ok(BlockOutcome::NotCompressible);
            }
        }

        let kind = sizes.choice();
        debug!(
            "Block at {}: {} tokens, {} bytes; dynamic {}, static {}, stored {} -> {:?}",
            self.block_start,
            self.tokens.len(),
            sizes.stored,
            sizes.dynamic,
            sizes.static_codes,
            sizes.stored + STORED_OVERHEAD,
            kind
        );

        match kind {
            BlockKind::Stored => self.write_stored(last, writer)?,
            BlockKind::Static => {
                writer.write_bits((STATIC_BLOCK << 1) | last as u32, 3)?;
                write_tokens(
                    &self.tokens,
                    CodeTable::static_literal(),
                    CodeTable::static_distance(),
                    writer,
                )?;
                self.stats.record(BlockKind::Static);
            }
            BlockKind::Dynamic => {
                writer.write_bits((DYNAMIC_BLOCK << 1) | last as u32, 3)?;
                self.send_trees(writer)?;
                write_tokens(
                    &self.tokens,
                    self.literal.code_table(),
                    self.distance.code_table(),
                    writer,
                )?;
                self.stats.record(BlockKind::Dynamic);
            }
        }

        self.block_start += self.block_len;
        self.reset();
        self.first_block = false;
        Ok(BlockOutcome::Written(kind))
    }

    /// Copy the block's input bytes in stored blocks of at most 65535 bytes.
    fn write_stored(&mut self, last: bool, writer: &mut BitWriter<'_>) -> Result<()> {
        let mut rest = &self.input[self.block_start..self.block_start + self.block_len];

        loop {
            let (chunk, tail) = rest.split_at(rest.len().min(MAX_STORED_BLOCK));
            rest = tail;
            let final_block = last && rest.is_empty();

            writer.write_bits((STORED_BLOCK << 1) | final_block as u32, 3)?;
            writer.align_to_byte()?;

            let len = chunk.len() as u16;
            let [lo, hi] = len.to_le_bytes();
            let [nlo, nhi] = (!len).to_le_bytes();
            writer.write_bytes(&[lo, hi, nlo, nhi])?;
            writer.write_bytes(chunk)?;
            self.stats.record(BlockKind::Stored);

            if rest.is_empty() {
                return Ok(());
            }
        }
    }

    /// Send the code counts and code lengths of a dynamic block.
    fn send_trees(&mut self, writer: &mut BitWriter<'_>) -> Result<()> {
        let bl_codes = self.bit_length.bit_length_codes();

        self.literal.build_codes()?;
        writer.write_bits((self.literal.max_used_codes() - 257) as u32, 5)?;

        self.distance.build_codes()?;
        writer.write_bits((self.distance.max_used_codes() - 1) as u32, 5)?;

        self.bit_length.build_codes()?;
        writer.write_bits((bl_codes - 4) as u32, 4)?;

        self.bit_length.write_bit_length_lengths(bl_codes, writer)?;
        self.literal.write_code_lengths(&self.bit_length, writer)?;
        self.distance.write_code_lengths(&self.bit_length, writer)?;
        Ok(())
    }

    fn reset(&mut self) {
        self.tokens.clear();
        self.block_len = 0;
        self.extra_bits = 0;
        self.literal.reset();
        self.distance.reset();
        self.bit_length.reset();
    }
}

/// Write tokens and the end-of-block code.
fn write_tokens(
    tokens: &[Token],
    literal: CodeTable<'_>,
    distance: CodeTable<'_>,
    writer: &mut BitWriter<'_>,
) -> Result<()> {
    for token in tokens {
        match *token {
            Token::Literal(byte) => literal.write_symbol(writer, byte as usize)?,
            Token::Match {
                distance: dist,
                length,
            } => {
                let len = length as usize - MIN_MATCH;
                let len_code = LENGTH_CODE[len] as usize;
                literal.write_symbol(writer, len_code)?;
                writer.write_bits(len as u32, length_extra_bits(len_code))?;

                let dist = dist as usize - 1;
                let dist_code = DISTANCE_CODE[dist] as usize;
                distance.write_symbol(writer, dist_code)?;
                writer.write_bits(dist as u32, distance_extra_bits(dist_code))?;
            }
        }
    }

    literal.write_symbol(writer, END_OF_BLOCK)
}
