//! Length-limited Huffman code construction for DEFLATE compression.
//!
//! A DEFLATE block uses three Huffman alphabets:
//! - **Literal/Length**: 0-285 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-29 (back-reference distances)
//! - **Bit Length**: 0-18 (code lengths of the other two trees)
//!
//! The tree is built by repeatedly combining the two lowest-frequency nodes.
//! A combined node is placed after every node of equal frequency, which keeps
//! the tree as flat as the frequencies allow. When the deepest leaf still
//! exceeds the alphabet's bit limit, the lowest frequency group is raised to
//! the next distinct frequency and the tree is rebuilt.
//!
//! Codes are canonical (RFC 1951 Section 3.2.2) and stored bit-reversed, ready
//! for the LSB-first [`BitWriter`].

use crate::tables::{BIT_LENGTH_ORDER, STATIC_DISTANCE_CODE, STATIC_DISTANCE_LENGTH};
use crate::tables::{STATIC_LITERAL_CODE, STATIC_LITERAL_LENGTH, reverse16};
use log::trace;
use pdflate_core::BitWriter;
use pdflate_core::error::{PdflateError, Result};

/// Maximum code length for literal/length and distance codes.
pub const MAX_CODE_LENGTH: u8 = 15;

/// Maximum code length for bit-length codes.
pub const MAX_BIT_LENGTH_CODE_LENGTH: u8 = 7;

/// Repeat the previous code length 3-6 times.
const REPEAT_3_6: u8 = 16;
/// Repeat a zero length 3-10 times.
const ZEROS_3_10: u8 = 17;
/// Repeat a zero length 11-138 times.
const ZEROS_11_138: u8 = 18;

/// Total code space of a 16-bit left-aligned canonical code.
const CODE_SPACE: u32 = 1 << 16;

/// Size and bit limit of one of the three DEFLATE alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    /// Codes that are always transmitted, used or not.
    pub min_codes: usize,
    /// Number of symbols in the alphabet.
    pub max_codes: usize,
    /// Longest code allowed.
    pub max_bits: u8,
}

impl Alphabet {
    /// Literal/length alphabet.
    pub const LITERAL: Self = Self {
        min_codes: 257,
        max_codes: 286,
        max_bits: MAX_CODE_LENGTH,
    };

    /// Distance alphabet.
    pub const DISTANCE: Self = Self {
        min_codes: 2,
        max_codes: 30,
        max_bits: MAX_CODE_LENGTH,
    };

    /// Bit-length (code length) alphabet.
    pub const BIT_LENGTH: Self = Self {
        min_codes: 4,
        max_codes: 19,
        max_bits: MAX_BIT_LENGTH_CODE_LENGTH,
    };
}

/// A borrowed view of reversed codes and their lengths.
///
/// Blocks are written through a `CodeTable` so the same token writer serves
/// both the per-block dynamic codes and the fixed static codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeTable<'a> {
    /// Bit-reversed code per symbol.
    pub codes: &'a [u16],
    /// Code length per symbol, 0 when unused.
    pub lengths: &'a [u8],
}

impl CodeTable<'static> {
    /// Static literal/length codes (RFC 1951 Section 3.2.6).
    pub fn static_literal() -> Self {
        Self {
            codes: &STATIC_LITERAL_CODE,
            lengths: &STATIC_LITERAL_LENGTH,
        }
    }

    /// Static distance codes.
    pub fn static_distance() -> Self {
        Self {
            codes: &STATIC_DISTANCE_CODE,
            lengths: &STATIC_DISTANCE_LENGTH,
        }
    }
}

impl CodeTable<'_> {
    /// Write the code of `symbol`.
    #[inline]
    pub fn write_symbol(&self, writer: &mut BitWriter<'_>, symbol: usize) -> Result<()> {
        writer.write_bits(self.codes[symbol] as u32, self.lengths[symbol])
    }

    /// Number of bits needed to send every symbol `freqs[i]` times.
    pub fn cost(&self, freqs: &[u32]) -> u64 {
        freqs
            .iter()
            .zip(self.lengths)
            .map(|(&freq, &len)| freq as u64 * len as u64)
            .sum()
    }
}

/// Node of the frequency tree.
///
/// Parents store the index of their right child; the left child sits
/// immediately before it.
#[derive(Debug, Clone, Copy)]
struct FreqNode {
    symbol: Option<u16>,
    freq: u32,
    child: usize,
}

impl FreqNode {
    fn leaf(symbol: usize, freq: u32) -> Self {
        Self {
            symbol: Some(symbol as u16),
            freq,
            child: 0,
        }
    }

    fn parent(freq: u32, child: usize) -> Self {
        Self {
            symbol: None,
            freq,
            child,
        }
    }
}

/// One symbol of the run-length encoded code-length sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LengthSymbol {
    symbol: u8,
    extra: u8,
    extra_bits: u8,
}

impl LengthSymbol {
    fn plain(length: u8) -> Self {
        Self {
            symbol: length,
            extra: 0,
            extra_bits: 0,
        }
    }

    fn repeat(symbol: u8, extra: usize, extra_bits: u8) -> Self {
        Self {
            symbol,
            extra: extra as u8,
            extra_bits,
        }
    }
}

/// Run-length encode a code-length sequence with symbols 16, 17 and 18.
fn length_symbols(lengths: &[u8]) -> Vec<LengthSymbol> {
    let mut out = Vec::new();
    let mut index = 0;

    while index < lengths.len() {
        let len = lengths[index];
        let run = lengths[index..].iter().take_while(|&&l| l == len).count();
        index += run;

        if run < 3 {
            out.extend(std::iter::repeat_n(LengthSymbol::plain(len), run));
            continue;
        }

        if len != 0 {
            // first length goes out as itself, the rest as repeats of it
            out.push(LengthSymbol::plain(len));
            let count = run - 1;
            out.extend(std::iter::repeat_n(
                LengthSymbol::repeat(REPEAT_3_6, 6 - 3, 2),
                count / 6,
            ));
            let count = count % 6;
            if count < 3 {
                out.extend(std::iter::repeat_n(LengthSymbol::plain(len), count));
            } else {
                out.push(LengthSymbol::repeat(REPEAT_3_6, count - 3, 2));
            }
            continue;
        }

        out.extend(std::iter::repeat_n(
            LengthSymbol::repeat(ZEROS_11_138, 138 - 11, 7),
            run / 138,
        ));
        let count = run % 138;
        if count < 3 {
            out.extend(std::iter::repeat_n(LengthSymbol::plain(0), count));
        } else if count <= 10 {
            out.push(LengthSymbol::repeat(ZEROS_3_10, count - 3, 3));
        } else {
            out.push(LengthSymbol::repeat(ZEROS_11_138, count - 11, 7));
        }
    }

    out
}

/// A Huffman tree for one DEFLATE alphabet.
///
/// The tree owns the symbol frequencies of the current block; call
/// [`reset`](Self::reset) between blocks.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    alphabet: Alphabet,
    freqs: Vec<u32>,
    lengths: Vec<u8>,
    codes: Vec<u16>,
    max_used_codes: usize,
    nodes: Vec<FreqNode>,
}

impl HuffmanTree {
    /// Create an empty tree for `alphabet`.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            freqs: vec![0; alphabet.max_codes],
            lengths: vec![0; alphabet.max_codes],
            codes: vec![0; alphabet.max_codes],
            max_used_codes: alphabet.min_codes,
            nodes: Vec::with_capacity(2 * alphabet.max_codes),
        }
    }

    /// Clear all frequencies.
    pub fn reset(&mut self) {
        self.freqs.fill(0);
    }

    /// Count one occurrence of `symbol`.
    #[inline]
    pub fn add(&mut self, symbol: usize) {
        self.freqs[symbol] += 1;
    }

    /// Symbol frequencies of the current block.
    pub fn frequencies(&self) -> &[u32] {
        &self.freqs
    }

    /// Code lengths from the last [`build_tree`](Self::build_tree).
    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// Highest used symbol plus one, never below the alphabet minimum.
    pub fn max_used_codes(&self) -> usize {
        self.max_used_codes
    }

    /// Codes of this tree as a [`CodeTable`].
    pub fn code_table(&self) -> CodeTable<'_> {
        CodeTable {
            codes: &self.codes,
            lengths: &self.lengths,
        }
    }

    /// Compute code lengths from the current frequencies.
    ///
    /// Unused symbols get length 0. If fewer than two symbols are used,
    /// zero-frequency symbols are added so that every used symbol still
    /// gets a 1-bit code.
    pub fn build_tree(&mut self) -> Result<()> {
        let mut used = self.alphabet.max_codes;
        while used > self.alphabet.min_codes && self.freqs[used - 1] == 0 {
            used -= 1;
        }
        self.max_used_codes = used;

        self.nodes.clear();
        for (symbol, &freq) in self.freqs[..used].iter().enumerate() {
            if freq != 0 {
                self.nodes.push(FreqNode::leaf(symbol, freq));
            }
        }

        if self.nodes.len() < 2 {
            if self.nodes.is_empty() {
                self.nodes.push(FreqNode::leaf(0, 0));
            }
            let other = if self.nodes[0].symbol == Some(0) { 1 } else { 0 };
            self.nodes.push(FreqNode::leaf(other, 0));
        }

        // stable: equal frequencies stay in symbol order
        self.nodes.sort_by_key(|node| node.freq);
        self.lengths.fill(0);

        loop {
            self.combine_pairs();
            let depth = self.assign_lengths();
            if depth <= self.alphabet.max_bits as usize {
                return Ok(());
            }

            trace!(
                "Huffman tree depth {} exceeds {} bits, flattening",
                depth, self.alphabet.max_bits
            );
            self.adjust_nodes()?;
        }
    }

    /// Combine the two lowest nodes until one root remains.
    ///
    /// Nodes at and after `ptr` stay sorted by frequency; the parent of
    /// `ptr - 2` and `ptr - 1` goes after every node with a frequency not
    /// above its own.
    fn combine_pairs(&mut self) {
        let mut ptr = 2;
        while ptr < self.nodes.len() {
            let freq = self.nodes[ptr - 2].freq + self.nodes[ptr - 1].freq;
            let insert = ptr + self.nodes[ptr..].partition_point(|node| node.freq <= freq);
            self.nodes.insert(insert, FreqNode::parent(freq, ptr - 1));
            ptr += 2;
        }

        let end = self.nodes.len();
        let freq = self.nodes[end - 2].freq + self.nodes[end - 1].freq;
        self.nodes.push(FreqNode::parent(freq, end - 1));
    }

    /// Walk from the root and set each leaf's code length. Returns the depth
    /// of the deepest leaf.
    fn assign_lengths(&mut self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.nodes.len() - 1, 0usize)];

        while let Some((index, depth)) = stack.pop() {
            let node = self.nodes[index];
            match node.symbol {
                Some(symbol) => {
                    max_depth = max_depth.max(depth);
                    self.lengths[symbol as usize] = depth.min(u8::MAX as usize) as u8;
                }
                None => {
                    stack.push((node.child, depth + 1));
                    stack.push((node.child - 1, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Drop internal nodes and raise the lowest frequency group to the next
    /// distinct frequency.
    fn adjust_nodes(&mut self) -> Result<()> {
        self.nodes.retain(|node| node.symbol.is_some());

        let lowest = self.nodes[0].freq;
        let Some(next) = self.nodes.iter().map(|node| node.freq).find(|&f| f != lowest) else {
            return Err(PdflateError::tree_balance(
                self.alphabet.max_bits,
                self.nodes.len(),
            ));
        };

        for node in self.nodes.iter_mut().take_while(|node| node.freq == lowest) {
            node.freq = next;
        }
        Ok(())
    }

    /// Assign canonical codes from the code lengths.
    ///
    /// The code space of every length must add up to exactly 2^16.
    pub fn build_codes(&mut self) -> Result<()> {
        let used = self.max_used_codes;
        let max_bits = self.alphabet.max_bits as usize;

        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        for &len in &self.lengths[..used] {
            if len != 0 {
                bl_count[len as usize] += 1;
            }
        }

        let mut first_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=max_bits {
            first_code[bits] = code;
            code += bl_count[bits] << (16 - bits);
        }

        if code != CODE_SPACE {
            return Err(PdflateError::inconsistent_code_lengths(code, CODE_SPACE));
        }

        self.codes.fill(0);
        for symbol in 0..used {
            let bits = self.lengths[symbol] as usize;
            if bits > 0 {
                self.codes[symbol] = reverse16(first_code[bits]);
                first_code[bits] += 1 << (16 - bits);
            }
        }

        Ok(())
    }

    /// Write the code of `symbol`.
    #[inline]
    pub fn write_symbol(&self, writer: &mut BitWriter<'_>, symbol: usize) -> Result<()> {
        self.code_table().write_symbol(writer, symbol)
    }

    /// Bits needed to send the current frequencies with the current lengths.
    pub fn encoded_length(&self) -> u64 {
        self.code_table().cost(&self.freqs[..self.max_used_codes])
    }

    /// Add the run-length encoded code lengths of this tree to the
    /// frequencies of `bl_tree`. Returns the number of extra bits the
    /// repeat symbols need.
    pub fn count_code_lengths(&self, bl_tree: &mut HuffmanTree) -> u64 {
        length_symbols(&self.lengths[..self.max_used_codes])
            .into_iter()
            .map(|sym| {
                bl_tree.add(sym.symbol as usize);
                sym.extra_bits as u64
            })
            .sum()
    }

    /// Send the code lengths of this tree coded with `bl_tree`.
    pub fn write_code_lengths(&self, bl_tree: &HuffmanTree, writer: &mut BitWriter<'_>) -> Result<()> {
        for sym in length_symbols(&self.lengths[..self.max_used_codes]) {
            bl_tree.write_symbol(writer, sym.symbol as usize)?;
            writer.write_bits(sym.extra as u32, sym.extra_bits)?;
        }
        Ok(())
    }

    /// Number of bit-length code lengths to transmit (4-19).
    ///
    /// Only meaningful for the bit-length tree.
    pub fn bit_length_codes(&self) -> usize {
        (4..BIT_LENGTH_ORDER.len())
            .rev()
            .find(|&rank| self.lengths[BIT_LENGTH_ORDER[rank]] > 0)
            .map_or(4, |rank| rank + 1)
    }

    /// Send the first `count` bit-length code lengths, 3 bits each, in
    /// transmission order.
    pub fn write_bit_length_lengths(&self, count: usize, writer: &mut BitWriter<'_>) -> Result<()> {
        for &symbol in &BIT_LENGTH_ORDER[..count] {
            writer.write_bits(self.lengths[symbol] as u32, 3)?;
        }
        Ok(())
    }
}
