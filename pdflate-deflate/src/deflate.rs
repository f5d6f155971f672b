//! DEFLATE compression engine with zlib framing.
//!
//! The engine runs the LZ77 matcher over the whole input, hands the tokens
//! to the block compressor and wraps the result in a zlib header and
//! Adler-32 trailer.
//!
//! The output buffer is as large as the input. Compression is only worth
//! keeping if the complete stream is smaller, so running out of room at any
//! point means the input is not compressible.

use crate::block::{BlockCompressor, BlockOutcome, BlockStats};
use crate::config::DeflateConfig;
use crate::lz77::{Lz77Matcher, Token};
use crate::zlib::{HEADER_LEN, TRAILER_LEN, ZLIB_HEADER, trailer};
use log::debug;
use pdflate_core::error::Result;
use pdflate_core::{Adler32, BitWriter};

/// Why an input was left uncompressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotCompressible {
    /// Shorter than the configured minimum.
    TooSmall,
    /// The zlib stream would not be smaller than the input.
    NoGain,
}

/// A complete zlib stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedStream {
    /// Header, DEFLATE blocks and trailer.
    pub data: Vec<u8>,
    /// Blocks written, by encoding.
    pub stats: BlockStats,
}

/// Result of compressing a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deflated {
    /// The input compressed.
    Compressed(CompressedStream),
    /// The input should be stored as is.
    NotCompressible(NotCompressible),
}

impl Deflated {
    /// Whether compression produced a stream.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Deflated::Compressed(_))
    }

    /// The compressed stream, if any.
    pub fn stream(&self) -> Option<&CompressedStream> {
        match self {
            Deflated::Compressed(stream) => Some(stream),
            Deflated::NotCompressible(_) => None,
        }
    }

    /// The compressed bytes, if any.
    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Deflated::Compressed(stream) => Some(stream.data),
            Deflated::NotCompressible(_) => None,
        }
    }
}

/// Zlib/DEFLATE compressor for in-memory buffers.
///
/// The engine holds only its configuration; all working state lives inside
/// one [`compress`](Self::compress) call, so an engine can be shared freely.
///
/// # Example
///
/// ```
/// use pdflate_deflate::{Deflated, DeflateEngine, NotCompressible};
///
/// let engine = DeflateEngine::default();
///
/// let page = b"0 0 m 100 100 l S ".repeat(50);
/// assert!(engine.compress(&page).unwrap().is_compressed());
///
/// assert_eq!(
///     engine.compress(b"tiny").unwrap(),
///     Deflated::NotCompressible(NotCompressible::TooSmall)
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateEngine {
    config: DeflateConfig,
}

impl DeflateEngine {
    /// Create an engine, checking the configuration.
    pub fn new(config: DeflateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &DeflateConfig {
        &self.config
    }

    /// Compress `input` into a zlib stream.
    ///
    /// Returns [`Deflated::NotCompressible`] when the input is too short or
    /// when the stream would not be smaller than the input. Errors are
    /// reserved for internal failures of the Huffman builder.
    pub fn compress(&self, input: &[u8]) -> Result<Deflated> {
        if input.len() < self.config.min_input_len {
            debug!(
                "Input of {} bytes below minimum {}",
                input.len(),
                self.config.min_input_len
            );
            return Ok(Deflated::NotCompressible(NotCompressible::TooSmall));
        }

        compress_tokens(input, Lz77Matcher::new(input), self.config.block_capacity)
    }
}

/// Encode `tokens` (which must describe `input`) as a zlib stream no longer
/// than `input.len() - 1` bytes.
pub(crate) fn compress_tokens(
    input: &[u8],
    tokens: impl IntoIterator<Item = Token>,
    block_capacity: usize,
) -> Result<Deflated> {
    let no_gain = Ok(Deflated::NotCompressible(NotCompressible::NoGain));

    // header, blocks, trailer, and at least one byte saved
    let Some(stream_end) = input
        .len()
        .checked_sub(TRAILER_LEN + 1)
        .filter(|&end| end >= HEADER_LEN)
    else {
        return no_gain;
    };

    let mut out = vec![0u8; input.len()];
    out[..HEADER_LEN].copy_from_slice(&ZLIB_HEADER);

    let mut writer = BitWriter::new(&mut out[HEADER_LEN..stream_end]);
    let mut blocks = BlockCompressor::new(input, block_capacity);

    let result = tokens
        .into_iter()
        .try_for_each(|token| blocks.push(token, &mut writer))
        .and_then(|()| blocks.finish(&mut writer))
        .and_then(|outcome| Ok((outcome, writer.finish()?)));

    let written = match result {
        Ok((BlockOutcome::Written(_), written)) => written,
        Ok((BlockOutcome::NotCompressible, _)) => return no_gain,
        Err(e) if e.is_buffer_exhausted() => {
            debug!("Output budget of {} bytes exhausted", input.len());
            return no_gain;
        }
        Err(e) => return Err(e),
    };

    let end = HEADER_LEN + written;
    out[end..end + TRAILER_LEN].copy_from_slice(&trailer(Adler32::checksum(input)));
    out.truncate(end + TRAILER_LEN);

    let stats = blocks.stats();
    debug!(
        "Compressed {} bytes to {} in {} blocks",
        input.len(),
        out.len(),
        stats.total()
    );

    Ok(Deflated::Compressed(CompressedStream { data: out, stats }))
}
